use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::AggregateSeriesDto;
use compute::monthly_series;
use tracing::instrument;

use crate::helpers::converters::series_to_dto;
use crate::helpers::filters::parse_filter_query;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, FilterQuery, cache_key};

/// Get the monthly aggregate series for the filter
#[utoipa::path(
    get,
    path = "/api/v1/series",
    tag = "series",
    responses(
        (status = 200, description = "Series retrieved successfully", body = ApiResponse<AggregateSeriesDto>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_series(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AggregateSeriesDto>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("series", snapshot.generation, &query);
    if let Some(CachedData::Series(series)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            series,
            "Series retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let series = monthly_series(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = series_to_dto(&series);

    state
        .cache
        .insert(key, CachedData::Series(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(data, "Series retrieved successfully")))
}
