//! Headline indicators for the current selection: total births, average
//! births per region, busiest region, and dominant age bucket.

use model::AgeGroup;
use tracing::instrument;

use crate::aggregate::{mean_monthly_births_per_region, totals_by_age_group, totals_by_region};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::FilterSpec;

/// The KPI block shown above the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Total births across the selection.
    pub total_births: u64,
    /// Mean of the per-region monthly means; `None` for an empty selection.
    pub average_births_per_region: Option<f64>,
    /// Region with the highest total.
    pub top_region: Option<String>,
    /// Age bucket with the highest total.
    pub dominant_age_group: Option<AgeGroup>,
}

/// Computes the KPI block for the filtered dataset.
#[instrument(skip(dataset, filter))]
pub fn summarize(dataset: &Dataset, filter: &FilterSpec) -> Result<Summary> {
    let region_totals = totals_by_region(dataset, filter)?;
    let age_totals = totals_by_age_group(dataset, filter)?;

    let total_births: u64 = region_totals.iter().map(|t| t.total).sum();

    let average_births_per_region = mean_monthly_births_per_region(dataset, filter)?;

    let top_region = region_totals
        .iter()
        .max_by_key(|t| t.total)
        .map(|t| t.region.clone());

    let dominant_age_group = age_totals
        .iter()
        .max_by_key(|t| t.total)
        .map(|t| t.age_group);

    Ok(Summary {
        total_births,
        average_births_per_region,
        top_region,
        dominant_age_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SAMPLE_REGIONS, sample_dataset, sample_records};

    #[test]
    fn test_summary_matches_raw_rows() {
        let dataset = sample_dataset();
        let summary = summarize(&dataset, &FilterSpec::default()).unwrap();

        let raw: u64 = sample_records().iter().map(|r| r.count as u64).sum();
        assert_eq!(summary.total_births, raw);

        // Average is the nested mean: per-region monthly means, then the
        // mean across regions. All regions cover the same 24 months here.
        let expected_avg = raw as f64 / 3.0 / 24.0;
        let avg = summary.average_births_per_region.unwrap();
        assert!(
            (avg - expected_avg).abs() < 1e-9,
            "got {avg}, want {expected_avg}"
        );
        // The sample data grows with the region index.
        assert_eq!(summary.top_region.as_deref(), Some(SAMPLE_REGIONS[2]));
        assert!(summary.dominant_age_group.is_some());
    }

    #[test]
    fn test_empty_selection_summary() {
        let dataset = sample_dataset();
        let filter = FilterSpec {
            regions: vec!["Atlantis".to_string()],
            ..FilterSpec::default()
        };
        let summary = summarize(&dataset, &filter).unwrap();
        assert_eq!(summary.total_births, 0);
        assert_eq!(summary.average_births_per_region, None);
        assert_eq!(summary.top_region, None);
        assert_eq!(summary.dominant_age_group, None);
    }
}
