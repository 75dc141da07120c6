use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::ForecastDto;
use compute::{ComputeError, forecast, monthly_series};
use tracing::instrument;

use crate::helpers::converters::forecast_to_dto;
use crate::helpers::filters::parse_forecast_query;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, ForecastQuery, cache_key};

/// Forecast the monthly series for the filter
///
/// Requires at least two full years of observed months in the selection;
/// shorter selections get a 422 with a readable message rather than a
/// forecast.
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "forecast",
    responses(
        (status = 200, description = "Forecast computed successfully", body = ApiResponse<ForecastDto>),
        (status = 400, description = "Invalid filter or forecast parameters", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Too little observed data to forecast", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_forecast(
    Query(query): Query<ForecastQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ForecastDto>>, (StatusCode, Json<ErrorResponse>)> {
    let snapshot = state.store.current().await.map_err(ErrorResponse::internal)?;

    let key = cache_key("forecast", snapshot.generation, &query);
    if let Some(CachedData::Forecast(cached)) = state.cache.get(&key).await {
        return Ok(Json(ApiResponse::new(
            cached,
            "Forecast retrieved from cache",
        )));
    }

    let (filter, horizon, confidence) =
        parse_forecast_query(&query).map_err(ErrorResponse::bad_request)?;

    let series = monthly_series(&snapshot.dataset, &filter).map_err(ErrorResponse::internal)?;

    let result = match forecast(&series, horizon, confidence) {
        Ok(result) => result,
        Err(err @ ComputeError::InsufficientData(_)) => {
            return Err(ErrorResponse::unprocessable(err));
        }
        Err(err) => return Err(ErrorResponse::internal(err)),
    };
    let data = forecast_to_dto(&result);

    state
        .cache
        .insert(key, CachedData::Forecast(data.clone()))
        .await;

    Ok(Json(ApiResponse::new(
        data,
        "Forecast computed successfully",
    )))
}
