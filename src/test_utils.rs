#[cfg(test)]
pub mod test_utils {
    use crate::config::initialize_app_state;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use compute::testing::{sample_csv, short_sample_csv, write_temp_csv};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create AppState backed by the two-year sample dataset
    pub async fn setup_test_app_state() -> AppState {
        let path = write_temp_csv("app-state", &sample_csv());
        initialize_app_state(&path, None)
            .await
            .expect("Failed to initialize test app state")
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// This function sets up a tracing subscriber that outputs logs to STDERR,
    /// which is useful for debugging tests. The log level is determined by the
    /// RUST_LOG environment variable, defaulting to WARN if not set.
    ///
    /// # Returns
    ///
    /// A guard that will clean up the subscriber when dropped.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        // Get log level from environment variable or default to WARN
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();
        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// Create axum app backed by a dataset too short to forecast
    pub async fn setup_short_app() -> Router {
        let _guard = init_test_tracing();
        let path = write_temp_csv("short", &short_sample_csv());
        let state = initialize_app_state(&path, None)
            .await
            .expect("Failed to initialize short test app state");
        create_router(state)
    }
}
