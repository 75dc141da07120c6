use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::PrecomputedBundle;
use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::schemas::{AppState, CachedData, FilterQuery, cache_key};
use crate::state::DatasetStore;

/// Initialize application configuration and state
pub async fn initialize_app_state(
    data_path: &Path,
    bundle_path: Option<&Path>,
) -> Result<AppState> {
    // Load the dataset once up front
    info!(path = %data_path.display(), "loading source dataset");
    let store = Arc::new(DatasetStore::open(data_path.to_path_buf())?);

    // Initialize cache
    let cache = Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes
        .build();

    let state = AppState { store, cache };

    // Optional fast path: seed the cache from a precomputed bundle
    if let Some(bundle_path) = bundle_path {
        seed_cache_from_bundle(&state, data_path, bundle_path).await;
    }

    Ok(state)
}

/// Reads the precomputed aggregate bundle and inserts its contents under the
/// cache keys the unfiltered endpoints use. Skipped with a warning when the
/// bundle is unreadable or older than the source file; a stale or broken
/// bundle must never block startup.
async fn seed_cache_from_bundle(state: &AppState, data_path: &Path, bundle_path: &Path) {
    let source_mtime = std::fs::metadata(data_path).and_then(|m| m.modified()).ok();
    let bundle_mtime = std::fs::metadata(bundle_path)
        .and_then(|m| m.modified())
        .ok();
    match (source_mtime, bundle_mtime) {
        (Some(source), Some(bundle)) if bundle >= source => {}
        (_, None) => {
            debug!(path = %bundle_path.display(), "no precomputed bundle found");
            return;
        }
        (None, Some(_)) => {
            warn!(path = %data_path.display(), "cannot stat the source file to compare bundle freshness; ignoring the bundle");
            return;
        }
        (Some(_), Some(_)) => {
            warn!(path = %bundle_path.display(), "precomputed bundle is older than the source file; ignoring it");
            return;
        }
    }

    let bundle: PrecomputedBundle = match std::fs::read_to_string(bundle_path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from))
    {
        Ok(bundle) => bundle,
        Err(error) => {
            warn!(path = %bundle_path.display(), %error, "cannot read precomputed bundle; ignoring it");
            return;
        }
    };

    let generation = match state.store.current().await {
        Ok(snapshot) => snapshot.generation,
        Err(_) => return,
    };

    // The bundle holds unfiltered aggregates, so seed the default-query keys.
    let query = FilterQuery::default();
    let entries = [
        (
            cache_key("summary", generation, &query),
            CachedData::Summary(bundle.summary),
        ),
        (
            cache_key("regions", generation, &query),
            CachedData::Regions(bundle.regions),
        ),
        (
            cache_key("age_groups", generation, &query),
            CachedData::AgeGroups(bundle.age_groups),
        ),
        (
            cache_key("years", generation, &query),
            CachedData::Years(bundle.years),
        ),
        (
            cache_key("months", generation, &query),
            CachedData::Months(bundle.months),
        ),
        (
            cache_key("heatmap", generation, &query),
            CachedData::Heatmap(bundle.heatmap),
        ),
        (
            cache_key("series", generation, &query),
            CachedData::Series(bundle.series),
        ),
    ];
    for (key, value) in entries {
        state.cache.insert(key, value).await;
    }

    info!(
        path = %bundle_path.display(),
        generated_at = %bundle.generated_at,
        "seeded cache from precomputed bundle"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::precompute;
    use compute::testing::{sample_csv, write_temp_csv};

    fn bundle_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "natality-test-bundle-{}-{}.json",
            tag,
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_fresh_bundle_seeds_default_query_cache() {
        let data_path = write_temp_csv("config_fresh", &sample_csv());
        let bundle = bundle_path("fresh");
        precompute(&data_path, &bundle).unwrap();

        let state = initialize_app_state(&data_path, Some(&bundle)).await.unwrap();
        let key = cache_key("summary", 0, &FilterQuery::default());
        assert!(matches!(
            state.cache.get(&key).await,
            Some(CachedData::Summary(_))
        ));

        std::fs::remove_file(data_path).ok();
        std::fs::remove_file(bundle).ok();
    }

    #[tokio::test]
    async fn test_missing_bundle_is_ignored() {
        let data_path = write_temp_csv("config_no_bundle", &sample_csv());
        let bundle = bundle_path("missing");

        let state = initialize_app_state(&data_path, Some(&bundle)).await.unwrap();
        let key = cache_key("summary", 0, &FilterQuery::default());
        assert!(state.cache.get(&key).await.is_none());

        std::fs::remove_file(data_path).ok();
    }

    #[tokio::test]
    async fn test_unreadable_source_skips_seeding() {
        let data_path = write_temp_csv("config_unstatable", &sample_csv());
        let bundle = bundle_path("unstatable");
        precompute(&data_path, &bundle).unwrap();

        let state = initialize_app_state(&data_path, None).await.unwrap();
        // Source gone: freshness cannot be established, so nothing is seeded.
        std::fs::remove_file(&data_path).unwrap();
        seed_cache_from_bundle(&state, &data_path, &bundle).await;

        let key = cache_key("summary", 0, &FilterQuery::default());
        assert!(state.cache.get(&key).await.is_none());

        std::fs::remove_file(bundle).ok();
    }
}
