use axum::{extract::State, http::StatusCode, response::Json};
use tracing::instrument;

use crate::schemas::{AppState, HealthResponse};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Service is unhealthy", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    // Confirm the dataset is loadable (and pick up on-disk changes)
    let dataset = match state.store.current().await {
        Ok(snapshot) => format!("loaded ({} records)", snapshot.dataset.records()),
        Err(_) => "unavailable".to_string(),
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset,
    };

    Ok(Json(response))
}
