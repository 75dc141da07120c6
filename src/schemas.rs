use std::sync::Arc;

use axum::{http::StatusCode, response::Json};
use common::{
    AgeGroupTotalDto, AggregateSeriesDto, BirthRecordDto, ForecastDto, ForecastPointDto,
    HeatmapRowDto, MonthOfYearMeanDto, RegionTotalDto, SeriesPointDto, SummaryDto, YearTotalDto,
};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::state::DatasetStore;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// The loaded dataset (load-once, reload on source change)
    pub store: Arc<DatasetStore>,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Records(Vec<BirthRecordDto>),
    Regions(Vec<RegionTotalDto>),
    AgeGroups(Vec<AgeGroupTotalDto>),
    Years(Vec<YearTotalDto>),
    Months(Vec<MonthOfYearMeanDto>),
    Heatmap(Vec<HeatmapRowDto>),
    Series(AggregateSeriesDto),
    Summary(SummaryDto),
    Forecast(ForecastDto),
}

/// Builds a cache key from the endpoint prefix, the dataset generation, and
/// the request parameters. The generation component drops every cached entry
/// when the source file is reloaded.
pub fn cache_key(prefix: &str, generation: u64, query: &impl std::fmt::Debug) -> String {
    format!("{prefix}_g{generation}_{query:?}")
}

/// Filter parameters shared by the aggregate endpoints
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FilterQuery {
    /// Regions to include (comma-separated); all when absent
    pub regions: Option<String>,
    /// Age group labels to include (comma-separated, e.g. `<20,30-39`)
    pub age_groups: Option<String>,
    /// First period to include (YYYY-MM)
    pub start: Option<String>,
    /// Last period to include (YYYY-MM)
    pub end: Option<String>,
    /// Months of year to include (comma-separated, 1-12)
    pub months: Option<String>,
}

/// Parameters for the forecast endpoint
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ForecastQuery {
    /// Regions to include (comma-separated); all when absent
    pub regions: Option<String>,
    /// Age group labels to include (comma-separated, e.g. `<20,30-39`)
    pub age_groups: Option<String>,
    /// First period to include (YYYY-MM)
    pub start: Option<String>,
    /// Last period to include (YYYY-MM)
    pub end: Option<String>,
    /// Months of year to include (comma-separated, 1-12)
    pub months: Option<String>,
    /// Months to forecast ahead (1-36, default 12)
    pub horizon: Option<u32>,
    /// Confidence level for the uncertainty interval (0-1, default 0.95)
    pub confidence: Option<f64>,
}

impl ForecastQuery {
    /// The filter portion of the query.
    pub fn filter(&self) -> FilterQuery {
        FilterQuery {
            regions: self.regions.clone(),
            age_groups: self.age_groups.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            months: self.months.clone(),
        }
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    fn reply(
        status: StatusCode,
        code: &str,
        error: impl std::fmt::Display,
    ) -> (StatusCode, Json<ErrorResponse>) {
        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                code: code.to_string(),
                success: false,
            }),
        )
    }

    /// Invalid request parameters
    pub fn bad_request(error: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
        Self::reply(StatusCode::BAD_REQUEST, "bad_request", error)
    }

    /// Valid request that cannot be served, e.g. too little data to forecast
    pub fn unprocessable(error: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
        Self::reply(StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", error)
    }

    /// Unexpected failure; the message stays generic for the client
    pub fn internal(error: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
        tracing::error!(%error, "request failed");
        Self::reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal server error",
        )
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Dataset status
    pub dataset: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::records::get_records,
        crate::handlers::aggregates::get_region_totals,
        crate::handlers::aggregates::get_age_group_totals,
        crate::handlers::aggregates::get_year_totals,
        crate::handlers::aggregates::get_month_means,
        crate::handlers::aggregates::get_heatmap,
        crate::handlers::series::get_series,
        crate::handlers::summary::get_summary,
        crate::handlers::forecast::get_forecast,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            FilterQuery,
            ForecastQuery,
            BirthRecordDto,
            RegionTotalDto,
            AgeGroupTotalDto,
            YearTotalDto,
            MonthOfYearMeanDto,
            HeatmapRowDto,
            SeriesPointDto,
            AggregateSeriesDto,
            SummaryDto,
            ForecastPointDto,
            ForecastDto,
            ApiResponse<SummaryDto>,
            ApiResponse<AggregateSeriesDto>,
            ApiResponse<ForecastDto>,
            ApiResponse<Vec<BirthRecordDto>>,
            ApiResponse<Vec<RegionTotalDto>>,
            ApiResponse<Vec<AgeGroupTotalDto>>,
            ApiResponse<Vec<YearTotalDto>>,
            ApiResponse<Vec<MonthOfYearMeanDto>>,
            ApiResponse<Vec<HeatmapRowDto>>,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "records", description = "Filtered birth records"),
        (name = "aggregates", description = "Grouped birth totals and means"),
        (name = "series", description = "Monthly aggregate series"),
        (name = "summary", description = "Headline indicators"),
        (name = "forecast", description = "Monthly birth forecasts"),
    ),
    info(
        title = "Natality API",
        description = "Scottish births analytics service - filtered aggregates and forecasts over the monthly region dataset",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
