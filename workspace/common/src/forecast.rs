use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One forecast month beyond the observed range.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastPointDto {
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u32,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A forecast of the monthly series: point forecast plus uncertainty
/// interval per future month, `lower <= predicted <= upper` throughout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastDto {
    /// Confidence level of the interval, e.g. 0.95.
    pub confidence: f64,
    /// Number of forecast months.
    pub horizon: usize,
    pub points: Vec<ForecastPointDto>,
}
