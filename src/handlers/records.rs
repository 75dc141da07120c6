use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::BirthRecordDto;
use compute::filtered_records;
use tracing::instrument;

use crate::helpers::converters::records_to_dtos;
use crate::helpers::filters::parse_filter_query;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, FilterQuery, cache_key};

/// Get the normalized birth records matching the filter
#[utoipa::path(
    get,
    path = "/api/v1/records",
    tag = "records",
    responses(
        (status = 200, description = "Records retrieved successfully", body = ApiResponse<Vec<BirthRecordDto>>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_records(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BirthRecordDto>>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    // Check cache first
    let key = cache_key("records", snapshot.generation, &query);
    if let Some(CachedData::Records(records)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            records,
            "Records retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let records = filtered_records(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = records_to_dtos(records);

    state
        .cache
        .insert(key, CachedData::Records(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(
        data,
        "Records retrieved successfully",
    )))
}
