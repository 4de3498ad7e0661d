use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::ideas::{dtos as ideas_dtos, events as ideas_events, handlers as ideas_handlers};
use crate::features::statuses::{dtos as statuses_dtos, handlers as statuses_handlers};
use crate::features::users::{dtos as users_dtos, models as users_models};
use crate::features::votes::{dtos as votes_dtos, handlers as votes_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Ideas
        ideas_handlers::list_ideas,
        ideas_handlers::create_idea,
        ideas_handlers::get_idea,
        ideas_handlers::delete_idea,
        ideas_handlers::set_status,
        ideas_handlers::mark_as_spam,
        ideas_handlers::mark_as_not_spam,
        ideas_handlers::idea_events,
        // Votes
        votes_handlers::vote,
        votes_handlers::remove_vote,
        // Statuses (public)
        statuses_handlers::list_statuses,
        statuses_handlers::status_counts,
        // Categories (public)
        categories_handlers::list_categories,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            // Users
            users_models::Role,
            users_dtos::UserResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            // Ideas
            ideas_dtos::CreateIdeaDto,
            ideas_dtos::SetStatusDto,
            ideas_dtos::IdeaCategoryDto,
            ideas_dtos::IdeaStatusDto,
            ideas_dtos::IdeaAuthorDto,
            ideas_dtos::IdeaResponseDto,
            ideas_dtos::SpamReportDto,
            ideas_events::IdeaEvent,
            ApiResponse<ideas_dtos::IdeaResponseDto>,
            ApiResponse<Vec<ideas_dtos::IdeaResponseDto>>,
            ApiResponse<ideas_dtos::SpamReportDto>,
            // Votes
            votes_dtos::VoteStateDto,
            ApiResponse<votes_dtos::VoteStateDto>,
            // Statuses
            statuses_dtos::StatusResponseDto,
            statuses_dtos::StatusCountDto,
            statuses_dtos::StatusCountsDto,
            ApiResponse<Vec<statuses_dtos::StatusResponseDto>>,
            ApiResponse<statuses_dtos::StatusCountsDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and the current account"),
        (name = "ideas", description = "Idea submission, listing and admin triage"),
        (name = "votes", description = "One vote per user per idea"),
        (name = "statuses", description = "Workflow statuses and idea counts (public)"),
        (name = "categories", description = "Idea categories (public)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Idea Board API",
        version = "0.1.0",
        description = "API documentation for the Idea Board",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_idea_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/ideas"));
        assert!(paths.contains_key("/api/ideas/{slug}/vote"));
        assert!(paths.contains_key("/api/ideas/{slug}/status"));
        assert!(paths.contains_key("/api/statuses/counts"));
    }
}
