use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::core::middleware;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::AuthService;
use crate::features::auth::JwtService;
use crate::features::categories::routes as categories_routes;
use crate::features::categories::services::CategoryService;
use crate::features::ideas::routes as ideas_routes;
use crate::features::ideas::services::IdeaService;
use crate::features::statuses::routes as statuses_routes;
use crate::features::statuses::services::StatusService;
use crate::features::votes::handlers::VoteState;
use crate::features::votes::routes as votes_routes;
use crate::features::votes::services::VoteService;

/// Services handed to the HTTP layer
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub categories: Arc<CategoryService>,
    pub statuses: Arc<StatusService>,
    pub ideas: Arc<IdeaService>,
    pub votes: Arc<VoteService>,
}

/// Simple health check endpoint (no auth required)
async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// API routes with bearer-token identity attached where a token is sent.
///
/// Swagger, CORS, request ids and tracing are layered on in `main`.
pub fn build_router(services: &AppServices, jwt: Arc<JwtService>) -> Router {
    let api = Router::new()
        .merge(auth_routes::routes(Arc::clone(&services.auth)))
        .merge(ideas_routes::routes(Arc::clone(&services.ideas)))
        .merge(votes_routes::routes(VoteState {
            ideas: Arc::clone(&services.ideas),
            votes: Arc::clone(&services.votes),
        }))
        .merge(statuses_routes::routes(Arc::clone(&services.statuses)))
        .merge(categories_routes::routes(Arc::clone(&services.categories)))
        .route_layer(from_fn_with_state(jwt, middleware::auth_middleware));

    Router::new()
        .merge(api)
        .route("/health", get(health_check))
}
