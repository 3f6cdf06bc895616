pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::document::MAX_DOCUMENT_BYTES;
use crate::matching::handlers;
use crate::state::AppState;

/// Multipart framing on top of the document itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/match/rank", post(handlers::handle_rank))
        .route(
            "/api/v1/match/upload",
            post(handlers::handle_upload)
                .layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES + UPLOAD_OVERHEAD_BYTES)),
        )
        .with_state(state)
}
