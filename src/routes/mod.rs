/// Application routes configuration
use crate::handlers::{download_report, get_report, health, trigger_report, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Report endpoints
        .route("/trigger_report", post(trigger_report))
        .route("/get_report", get(get_report))
        .route("/download_report", get(download_report))
        .with_state(state)
}
