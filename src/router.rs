use crate::handlers::{
    aggregates::{
        get_age_group_totals, get_heatmap, get_month_means, get_region_totals, get_year_totals,
    },
    forecast::get_forecast,
    health::health_check,
    records::get_records,
    series::get_series,
    summary::get_summary,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{Router, routing::get};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Filtered records
        .route("/api/v1/records", get(get_records))
        // Aggregate routes
        .route("/api/v1/aggregates/regions", get(get_region_totals))
        .route("/api/v1/aggregates/age-groups", get(get_age_group_totals))
        .route("/api/v1/aggregates/years", get(get_year_totals))
        .route("/api/v1/aggregates/months", get(get_month_means))
        .route("/api/v1/aggregates/heatmap", get(get_heatmap))
        // Series and derived views
        .route("/api/v1/series", get(get_series))
        .route("/api/v1/summary", get(get_summary))
        .route("/api/v1/forecast", get(get_forecast))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
