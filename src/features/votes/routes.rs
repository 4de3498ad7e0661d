use axum::{routing::post, Router};

use crate::features::votes::handlers::{self, VoteState};

/// Vote routes; both require a signed-in caller
pub fn routes(state: VoteState) -> Router {
    Router::new()
        .route(
            "/api/ideas/{slug}/vote",
            post(handlers::vote).delete(handlers::remove_vote),
        )
        .with_state(state)
}
