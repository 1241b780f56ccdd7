pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cv::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/cv/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/cv/upload",
            post(handlers::handle_upload).layer(DefaultBodyLimit::max(handlers::MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/cv/render", post(handlers::handle_render))
        .route("/api/v1/cv/versions/:id", get(handlers::handle_get_version))
        .route(
            "/api/v1/cv/versions/:id/lineage",
            get(handlers::handle_lineage),
        )
        .route("/api/v1/cv/versions/:id/fix", post(handlers::handle_fix))
        .with_state(state)
}
