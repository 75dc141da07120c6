use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One normalized birth record (region, month, age bucket, count).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BirthRecordDto {
    pub region: String,
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u32,
    /// Age bucket label as it appears in the source file.
    pub age_group: String,
    pub count: u32,
}

/// Total births for one region.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RegionTotalDto {
    pub region: String,
    pub total: u64,
}

/// Total births for one age bucket.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AgeGroupTotalDto {
    pub age_group: String,
    pub total: u64,
}

/// Total births for one calendar year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct YearTotalDto {
    pub year: i32,
    pub total: u64,
}

/// Mean monthly births for one month of the year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MonthOfYearMeanDto {
    /// Month of year, 1-12.
    pub month: u32,
    /// English month name, for chart labels.
    pub month_name: String,
    pub mean: f64,
}

/// One heatmap row: a region's mean monthly births per month of year.
/// `means[0]` is January; `null` marks months with no selected data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HeatmapRowDto {
    pub region: String,
    pub means: Vec<Option<f64>>,
}

/// One point of the monthly aggregate series.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SeriesPointDto {
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u32,
    pub value: f64,
}

/// The monthly aggregate series for the current selection; points are
/// contiguous months in increasing order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AggregateSeriesDto {
    pub points: Vec<SeriesPointDto>,
}

impl AggregateSeriesDto {
    pub fn new(points: Vec<SeriesPointDto>) -> Self {
        AggregateSeriesDto { points }
    }
}

/// Headline indicators for the current selection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SummaryDto {
    pub total_births: u64,
    /// Mean of the per-region monthly means; absent for an empty selection.
    pub average_births_per_region: Option<f64>,
    pub top_region: Option<String>,
    /// Age bucket label with the highest total.
    pub dominant_age_group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_dto_serialization_shape() {
        let dto = AggregateSeriesDto::new(vec![SeriesPointDto {
            year: 2023,
            month: 4,
            value: 1234.0,
        }]);
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["points"][0]["year"], 2023);
        assert_eq!(json["points"][0]["month"], 4);
        let back: AggregateSeriesDto = serde_json::from_value(json).unwrap();
        assert_eq!(back, dto);
    }
}
