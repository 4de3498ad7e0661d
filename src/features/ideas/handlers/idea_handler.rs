use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, MaybeUser};
use crate::features::auth::AuthenticatedUser;
use crate::features::ideas::dtos::{
    CreateIdeaDto, IdeaListQuery, IdeaResponseDto, SetStatusDto, SpamReportDto,
};
use crate::features::ideas::services::IdeaService;
use crate::shared::types::ApiResponse;

/// List ideas, newest first, ten per page
#[utoipa::path(
    get,
    path = "/api/ideas",
    params(IdeaListQuery),
    responses(
        (status = 200, description = "Page of ideas", body = ApiResponse<Vec<IdeaResponseDto>>),
    ),
    tag = "ideas"
)]
pub async fn list_ideas(
    MaybeUser(user): MaybeUser,
    State(service): State<Arc<IdeaService>>,
    Query(query): Query<IdeaListQuery>,
) -> Result<Json<ApiResponse<Vec<IdeaResponseDto>>>> {
    let (ideas, meta) = service.list(&query, user.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(ideas), None, Some(meta))))
}

/// Submit a new idea
#[utoipa::path(
    post,
    path = "/api/ideas",
    request_body = CreateIdeaDto,
    responses(
        (status = 201, description = "Idea created", body = ApiResponse<IdeaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_idea(
    user: AuthenticatedUser,
    State(service): State<Arc<IdeaService>>,
    AppJson(dto): AppJson<CreateIdeaDto>,
) -> Result<(StatusCode, Json<ApiResponse<IdeaResponseDto>>)> {
    let idea = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(idea),
            Some("Idea was added successfully!".to_string()),
            None,
        )),
    ))
}

/// Get an idea by slug
#[utoipa::path(
    get,
    path = "/api/ideas/{slug}",
    params(
        ("slug" = String, Path, description = "Idea slug")
    ),
    responses(
        (status = 200, description = "Idea found", body = ApiResponse<IdeaResponseDto>),
        (status = 404, description = "Idea not found")
    ),
    tag = "ideas"
)]
pub async fn get_idea(
    MaybeUser(user): MaybeUser,
    State(service): State<Arc<IdeaService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<IdeaResponseDto>>> {
    let idea = service.get_by_slug(&slug, user.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(idea), None, None)))
}

/// Delete an idea (admin)
#[utoipa::path(
    delete,
    path = "/api/ideas/{slug}",
    params(
        ("slug" = String, Path, description = "Idea slug")
    ),
    responses(
        (status = 200, description = "Idea deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Idea not found")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_idea(
    user: AuthenticatedUser,
    State(service): State<Arc<IdeaService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&slug, &user).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Idea was deleted successfully!".to_string()),
        None,
    )))
}

/// Change an idea's status (admin)
#[utoipa::path(
    put,
    path = "/api/ideas/{slug}/status",
    params(
        ("slug" = String, Path, description = "Idea slug")
    ),
    request_body = SetStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<IdeaResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Idea or status not found")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_status(
    user: AuthenticatedUser,
    State(service): State<Arc<IdeaService>>,
    Path(slug): Path<String>,
    AppJson(dto): AppJson<SetStatusDto>,
) -> Result<Json<ApiResponse<IdeaResponseDto>>> {
    let idea = service.set_status(&slug, dto, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(idea),
        Some("Status was updated successfully!".to_string()),
        None,
    )))
}

/// Report an idea as spam
#[utoipa::path(
    post,
    path = "/api/ideas/{slug}/spam",
    params(
        ("slug" = String, Path, description = "Idea slug")
    ),
    responses(
        (status = 200, description = "Spam report recorded", body = ApiResponse<SpamReportDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Idea not found")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_as_spam(
    user: AuthenticatedUser,
    State(service): State<Arc<IdeaService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<SpamReportDto>>> {
    let report = service.mark_as_spam(&slug, &user).await?;
    // The counter is admin-only information
    let data = user.is_admin().then_some(report);
    Ok(Json(ApiResponse::success(
        data,
        Some("Idea was marked as spam!".to_string()),
        None,
    )))
}

/// Reset an idea's spam reports (admin)
#[utoipa::path(
    delete,
    path = "/api/ideas/{slug}/spam",
    params(
        ("slug" = String, Path, description = "Idea slug")
    ),
    responses(
        (status = 200, description = "Spam reports reset", body = ApiResponse<SpamReportDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Idea not found")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_as_not_spam(
    user: AuthenticatedUser,
    State(service): State<Arc<IdeaService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<SpamReportDto>>> {
    let report = service.mark_as_not_spam(&slug, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Spam counter was reset!".to_string()),
        None,
    )))
}
