use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::ideas::handlers;
use crate::features::ideas::services::IdeaService;

/// Idea routes. Guests may read; handlers that need an identity extract
/// `AuthenticatedUser`, and admin checks happen in the service.
pub fn routes(service: Arc<IdeaService>) -> Router {
    Router::new()
        .route(
            "/api/ideas",
            get(handlers::list_ideas).post(handlers::create_idea),
        )
        .route("/api/ideas/events", get(handlers::idea_events))
        .route(
            "/api/ideas/{slug}",
            get(handlers::get_idea).delete(handlers::delete_idea),
        )
        .route("/api/ideas/{slug}/status", put(handlers::set_status))
        .route(
            "/api/ideas/{slug}/spam",
            post(handlers::mark_as_spam).delete(handlers::mark_as_not_spam),
        )
        .with_state(service)
}
