use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    AgeGroupTotalDto, AggregateSeriesDto, HeatmapRowDto, MonthOfYearMeanDto, RegionTotalDto,
    SummaryDto, YearTotalDto,
};

/// Serialized unfiltered aggregates, written by `precompute` and read once
/// at startup as a fast-path cache seed when newer than the source file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PrecomputedBundle {
    /// When the bundle was computed.
    pub generated_at: DateTime<Utc>,
    pub summary: SummaryDto,
    pub regions: Vec<RegionTotalDto>,
    pub age_groups: Vec<AgeGroupTotalDto>,
    pub years: Vec<YearTotalDto>,
    pub months: Vec<MonthOfYearMeanDto>,
    pub heatmap: Vec<HeatmapRowDto>,
    pub series: AggregateSeriesDto,
}
