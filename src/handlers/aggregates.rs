use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::{AgeGroupTotalDto, HeatmapRowDto, MonthOfYearMeanDto, RegionTotalDto, YearTotalDto};
use compute::{
    mean_by_month_of_year, region_month_matrix, totals_by_age_group, totals_by_region,
    totals_by_year,
};
use tracing::instrument;

use crate::helpers::converters::{
    age_group_totals_to_dtos, heatmap_to_dtos, month_means_to_dtos, region_totals_to_dtos,
    year_totals_to_dtos,
};
use crate::helpers::filters::parse_filter_query;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, FilterQuery, cache_key};

/// Get total births per region for the filter
#[utoipa::path(
    get,
    path = "/api/v1/aggregates/regions",
    tag = "aggregates",
    responses(
        (status = 200, description = "Region totals retrieved successfully", body = ApiResponse<Vec<RegionTotalDto>>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_region_totals(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RegionTotalDto>>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("regions", snapshot.generation, &query);
    if let Some(CachedData::Regions(totals)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            totals,
            "Region totals retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let totals = totals_by_region(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = region_totals_to_dtos(totals);

    state
        .cache
        .insert(key, CachedData::Regions(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(
        data,
        "Region totals retrieved successfully",
    )))
}

/// Get total births per age group for the filter
#[utoipa::path(
    get,
    path = "/api/v1/aggregates/age-groups",
    tag = "aggregates",
    responses(
        (status = 200, description = "Age group totals retrieved successfully", body = ApiResponse<Vec<AgeGroupTotalDto>>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_age_group_totals(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AgeGroupTotalDto>>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("age_groups", snapshot.generation, &query);
    if let Some(CachedData::AgeGroups(totals)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            totals,
            "Age group totals retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let totals =
        totals_by_age_group(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = age_group_totals_to_dtos(totals);

    state
        .cache
        .insert(key, CachedData::AgeGroups(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(
        data,
        "Age group totals retrieved successfully",
    )))
}

/// Get total births per calendar year for the filter
#[utoipa::path(
    get,
    path = "/api/v1/aggregates/years",
    tag = "aggregates",
    responses(
        (status = 200, description = "Year totals retrieved successfully", body = ApiResponse<Vec<YearTotalDto>>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_year_totals(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<YearTotalDto>>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("years", snapshot.generation, &query);
    if let Some(CachedData::Years(totals)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            totals,
            "Year totals retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let totals = totals_by_year(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = year_totals_to_dtos(totals);

    state
        .cache
        .insert(key, CachedData::Years(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(
        data,
        "Year totals retrieved successfully",
    )))
}

/// Get mean births per month of year for the filter
#[utoipa::path(
    get,
    path = "/api/v1/aggregates/months",
    tag = "aggregates",
    responses(
        (status = 200, description = "Month-of-year means retrieved successfully", body = ApiResponse<Vec<MonthOfYearMeanDto>>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_month_means(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthOfYearMeanDto>>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("months", snapshot.generation, &query);
    if let Some(CachedData::Months(means)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            means,
            "Month-of-year means retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let means =
        mean_by_month_of_year(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = month_means_to_dtos(means);

    state
        .cache
        .insert(key, CachedData::Months(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(
        data,
        "Month-of-year means retrieved successfully",
    )))
}

/// Get the region x month heatmap of mean monthly births for the filter
#[utoipa::path(
    get,
    path = "/api/v1/aggregates/heatmap",
    tag = "aggregates",
    responses(
        (status = 200, description = "Heatmap retrieved successfully", body = ApiResponse<Vec<HeatmapRowDto>>),
        (status = 400, description = "Invalid filter parameters", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_heatmap(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<HeatmapRowDto>>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("heatmap", snapshot.generation, &query);
    if let Some(CachedData::Heatmap(rows)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            rows,
            "Heatmap retrieved from cache",
        )));
    }

    let filter = parse_filter_query(&query).map_err(ErrorResponse::bad_request)?;
    let rows = region_month_matrix(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;
    let data = heatmap_to_dtos(rows);

    state
        .cache
        .insert(key, CachedData::Heatmap(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(
        data,
        "Heatmap retrieved successfully",
    )))
}
