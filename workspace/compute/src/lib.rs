//! Data preparation and forecasting for the births dataset.
//!
//! Two halves, matching the service's two responsibilities: the loader
//! ([`dataset`], [`filter`], [`aggregate`], [`summary`]) turns the source
//! spreadsheet into filtered aggregates, and [`forecast`] extrapolates the
//! monthly series with a seasonal model.

pub mod aggregate;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod forecast;
pub mod summary;
pub mod testing;

pub use aggregate::{
    AgeGroupTotal, AggregateSeries, HeatmapRow, MonthOfYearMean, RegionTotal, YearTotal,
    mean_by_month_of_year, mean_monthly_births_per_region, monthly_series, region_month_matrix,
    totals_by_age_group, totals_by_region, totals_by_year,
};
pub use dataset::{Dataset, LoadReport, filtered_records, load_dataset};
pub use error::{ComputeError, Result};
pub use filter::FilterSpec;
pub use forecast::{
    DEFAULT_CONFIDENCE_LEVEL, ForecastPoint, ForecastResult, MIN_OBSERVED_MONTHS, SEASON_LENGTH,
    forecast,
};
pub use summary::{Summary, summarize};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;

    /// End-to-end through the compute crate: filter, aggregate, forecast.
    #[test]
    fn test_pipeline_filter_aggregate_forecast() {
        let dataset = sample_dataset();
        let filter = FilterSpec {
            regions: vec![testing::SAMPLE_REGIONS[0].to_string()],
            ..FilterSpec::default()
        };

        let series = monthly_series(&dataset, &filter).unwrap();
        assert_eq!(series.len(), 24);

        let result = forecast(&series, 6, None).unwrap();
        assert_eq!(result.points.len(), 6);
        assert_eq!(
            result.points[0].period,
            series.last_period().unwrap().succ()
        );
    }
}
