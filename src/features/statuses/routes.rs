use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::statuses::handlers;
use crate::features::statuses::services::StatusService;

/// Public status directory routes
pub fn routes(service: Arc<StatusService>) -> Router {
    Router::new()
        .route("/api/statuses", get(handlers::list_statuses))
        .route("/api/statuses/counts", get(handlers::status_counts))
        .with_state(service)
}
