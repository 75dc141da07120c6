use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use common::PrecomputedBundle;
use compute::{
    FilterSpec, load_dataset, mean_by_month_of_year, monthly_series, region_month_matrix,
    summarize, totals_by_age_group, totals_by_region, totals_by_year,
};
use tracing::info;

use crate::helpers::converters::{
    age_group_totals_to_dtos, heatmap_to_dtos, month_means_to_dtos, region_totals_to_dtos,
    series_to_dto, summary_to_dto, year_totals_to_dtos,
};

/// Compute every unfiltered aggregate once and write the result as a JSON
/// bundle. `serve --bundle-path` loads it at startup to warm the cache.
pub fn precompute(data_path: &Path, output: &Path) -> Result<()> {
    info!("Loading dataset from {}", data_path.display());
    let dataset = load_dataset(data_path)
        .with_context(|| format!("failed to load dataset from {}", data_path.display()))?;
    info!(
        "Loaded {} records ({} rows read)",
        dataset.report().records,
        dataset.report().rows_read
    );

    let filter = FilterSpec::default();
    let bundle = PrecomputedBundle {
        generated_at: Utc::now(),
        summary: summary_to_dto(&summarize(&dataset, &filter)?),
        regions: region_totals_to_dtos(totals_by_region(&dataset, &filter)?),
        age_groups: age_group_totals_to_dtos(totals_by_age_group(&dataset, &filter)?),
        years: year_totals_to_dtos(totals_by_year(&dataset, &filter)?),
        months: month_means_to_dtos(mean_by_month_of_year(&dataset, &filter)?),
        heatmap: heatmap_to_dtos(region_month_matrix(&dataset, &filter)?),
        series: series_to_dto(&monthly_series(&dataset, &filter)?),
    };

    let json = serde_json::to_string_pretty(&bundle)?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write bundle to {}", output.display()))?;
    info!("Wrote precomputed bundle to {}", output.display());

    Ok(())
}
