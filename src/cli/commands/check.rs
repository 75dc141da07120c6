use std::path::Path;

use anyhow::{Context, Result};
use compute::load_dataset;
use tracing::warn;

/// Load the CSV file, print the load counters and dataset shape, and exit
/// non-zero when the file cannot be loaded at all.
pub fn check(data_path: &Path) -> Result<()> {
    let dataset = load_dataset(data_path)
        .with_context(|| format!("failed to load dataset from {}", data_path.display()))?;
    let report = dataset.report();

    println!("Dataset: {}", data_path.display());
    println!("  rows read:         {}", report.rows_read);
    println!("  records:           {}", report.records);
    println!("  dropped rows:      {}", report.dropped_rows);
    println!("  dropped cells:     {}", report.dropped_cells);
    println!("  duplicate records: {}", report.duplicate_records);

    let regions = dataset.regions()?;
    println!("  regions ({}):", regions.len());
    for region in &regions {
        println!("    {region}");
    }

    if !report.is_clean() {
        warn!("dataset loaded with dropped or duplicate data; see counters above");
    }

    Ok(())
}
