use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::SummaryDto;
use compute::summarize;
use tracing::instrument;

use crate::helpers::converters::summary_to_dto;
use crate::helpers::filters::parse_filter_query;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, FilterQuery, cache_key};

/// Get the headline indicators for the filter
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "summary",
    responses(
        (status = 200, description = "Summary retrieved successfully", body = ApiResponse<SummaryDto>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_summary(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SummaryDto>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("summary", snapshot.generation, &query);
    if let Some(CachedData::Summary(summary)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            summary,
            "Summary retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let summary = summarize(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = summary_to_dto(&summary);

    state
        .cache
        .insert(key, CachedData::Summary(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(data, "Summary retrieved successfully")))
}
