use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::statuses::dtos::{StatusCountsDto, StatusResponseDto};
use crate::features::statuses::services::StatusService;
use crate::shared::types::ApiResponse;

/// List all statuses
#[utoipa::path(
    get,
    path = "/api/statuses",
    responses(
        (status = 200, description = "Statuses in display order", body = ApiResponse<Vec<StatusResponseDto>>),
    ),
    tag = "statuses"
)]
pub async fn list_statuses(
    State(service): State<Arc<StatusService>>,
) -> Result<Json<ApiResponse<Vec<StatusResponseDto>>>> {
    let statuses = service.list().await?;
    Ok(Json(ApiResponse::success(Some(statuses), None, None)))
}

/// Number of ideas in each status, plus the total
#[utoipa::path(
    get,
    path = "/api/statuses/counts",
    responses(
        (status = 200, description = "Idea counts per status", body = ApiResponse<StatusCountsDto>),
    ),
    tag = "statuses"
)]
pub async fn status_counts(
    State(service): State<Arc<StatusService>>,
) -> Result<Json<ApiResponse<StatusCountsDto>>> {
    let counts = service.counts_by_status().await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}
