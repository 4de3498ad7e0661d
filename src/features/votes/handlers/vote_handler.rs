use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::AuthenticatedUser;
use crate::features::ideas::services::IdeaService;
use crate::features::votes::dtos::VoteStateDto;
use crate::features::votes::models::{UnvoteOutcome, VoteOutcome};
use crate::features::votes::services::VoteService;
use crate::shared::types::ApiResponse;

/// State for vote routes: votes are addressed through the idea slug
#[derive(Clone)]
pub struct VoteState {
    pub ideas: Arc<IdeaService>,
    pub votes: Arc<VoteService>,
}

/// Vote for an idea
#[utoipa::path(
    post,
    path = "/api/ideas/{slug}/vote",
    params(
        ("slug" = String, Path, description = "Idea slug")
    ),
    responses(
        (status = 200, description = "Vote state after voting", body = ApiResponse<VoteStateDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Idea not found")
    ),
    tag = "votes",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn vote(
    user: AuthenticatedUser,
    State(state): State<VoteState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<VoteStateDto>>> {
    let idea = state.ideas.find_idea(&slug).await?;
    let outcome = state.votes.vote(idea.id, &user).await?;

    let message = match outcome {
        VoteOutcome::Added => "Vote recorded",
        VoteOutcome::AlreadyExists => "You already voted for this idea",
    };

    let votes_count = state.votes.count_votes(idea.id).await?;
    Ok(Json(ApiResponse::success(
        Some(VoteStateDto {
            voted: true,
            votes_count,
        }),
        Some(message.to_string()),
        None,
    )))
}

/// Withdraw a vote
#[utoipa::path(
    delete,
    path = "/api/ideas/{slug}/vote",
    params(
        ("slug" = String, Path, description = "Idea slug")
    ),
    responses(
        (status = 200, description = "Vote state after withdrawing", body = ApiResponse<VoteStateDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Idea not found")
    ),
    tag = "votes",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_vote(
    user: AuthenticatedUser,
    State(state): State<VoteState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<VoteStateDto>>> {
    let idea = state.ideas.find_idea(&slug).await?;
    let outcome = state.votes.remove_vote(idea.id, &user).await?;

    let message = match outcome {
        UnvoteOutcome::Removed => "Vote removed",
        UnvoteOutcome::NotFound => "You had not voted for this idea",
    };

    let votes_count = state.votes.count_votes(idea.id).await?;
    Ok(Json(ApiResponse::success(
        Some(VoteStateDto {
            voted: false,
            votes_count,
        }),
        Some(message.to_string()),
        None,
    )))
}
