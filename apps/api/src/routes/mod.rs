pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/batch", post(handlers::handle_analyze_batch))
        // Export API (caller-held history in, report file out)
        .route("/api/v1/export/json", post(handlers::handle_export_json))
        .route("/api/v1/export/csv", post(handlers::handle_export_csv))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
