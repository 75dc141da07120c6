//! Process-wide dataset state.
//!
//! The dataset is loaded once and shared read-only behind an `Arc`. Each
//! request checks the source file's modification time and reloads when the
//! file changed on disk; the generation counter ticks on every reload so
//! cached responses keyed on it expire naturally.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compute::{Dataset, Result, load_dataset};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// A consistent view of the dataset at one point in time.
#[derive(Clone, Debug)]
pub struct DatasetSnapshot {
    pub dataset: Arc<Dataset>,
    /// Incremented whenever the source file is reloaded.
    pub generation: u64,
}

struct Loaded {
    dataset: Arc<Dataset>,
    modified: Option<SystemTime>,
    generation: u64,
}

/// Owner of the loaded dataset with the load-once / reload-on-change
/// lifecycle.
pub struct DatasetStore {
    path: PathBuf,
    inner: RwLock<Loaded>,
}

impl DatasetStore {
    /// Loads the dataset from `path`. Fails when the file is unreadable or
    /// missing required columns.
    pub fn open(path: PathBuf) -> Result<DatasetStore> {
        let dataset = Arc::new(load_dataset(&path)?);
        let modified = file_mtime(&path);
        Ok(DatasetStore {
            path,
            inner: RwLock::new(Loaded {
                dataset,
                modified,
                generation: 0,
            }),
        })
    }

    /// The current dataset, reloading first if the source file changed.
    pub async fn current(&self) -> Result<DatasetSnapshot> {
        let modified = file_mtime(&self.path);

        {
            let guard = self.inner.read().await;
            if guard.modified == modified {
                return Ok(DatasetSnapshot {
                    dataset: guard.dataset.clone(),
                    generation: guard.generation,
                });
            }
        }

        let mut guard = self.inner.write().await;
        // Another request may have reloaded while we waited for the lock.
        if guard.modified != modified {
            info!(path = %self.path.display(), "source file changed on disk; reloading dataset");
            guard.dataset = Arc::new(load_dataset(&self.path)?);
            guard.modified = modified;
            guard.generation += 1;
        }
        Ok(DatasetSnapshot {
            dataset: guard.dataset.clone(),
            generation: guard.generation,
        })
    }
}

impl fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
