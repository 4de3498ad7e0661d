use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::ideas::models::{IdeaDetail, IdeaFilter};
use crate::features::users::models::gravatar_url;
use crate::shared::constants::{ALL_STATUSES, IDEAS_PER_PAGE};
use crate::shared::validation::not_blank;

// =============================================================================
// REQUESTS
// =============================================================================

/// Request DTO for submitting an idea
///
/// Missing fields deserialize as empty so that every failing field is
/// reported together by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateIdeaDto {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "The title field is required."),
        length(max = 255, message = "The title may not be greater than 255 characters.")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(required(message = "The category field is required."))]
    pub category_id: Option<Uuid>,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "The description field is required."))]
    pub description: String,
}

/// Request DTO for changing an idea's status (admin)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetStatusDto {
    pub status_id: Uuid,
    /// Mail every voter about the change
    #[serde(default)]
    pub notify_voters: bool,
}

/// Query params for the idea listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdeaListQuery {
    /// Status name; `All` or absent means every status
    pub status: Option<String>,
    /// Category name; `All` or absent means every category
    pub category: Option<String>,
    /// Page number (1-indexed, default: 1)
    #[param(minimum = 1)]
    pub page: Option<i64>,
}

impl IdeaListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Rows to skip; saturates for absurd page numbers, which then read as empty
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(IDEAS_PER_PAGE)
    }

    pub fn filter(&self) -> IdeaFilter {
        IdeaFilter {
            status: normalize_filter(self.status.as_deref()),
            category: normalize_filter(self.category.as_deref()),
        }
    }
}

fn normalize_filter(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) if v.eq_ignore_ascii_case(ALL_STATUSES) => None,
        Some(v) => Some(v.to_string()),
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdeaCategoryDto {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdeaStatusDto {
    pub id: Uuid,
    pub name: String,
    pub classes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdeaAuthorDto {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// Response DTO for an idea in listings and on its own page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeaResponseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: IdeaCategoryDto,
    pub status: IdeaStatusDto,
    pub author: IdeaAuthorDto,
    pub votes_count: i64,
    pub voted_by_user: bool,
    /// Only present for admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_reports: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl IdeaResponseDto {
    pub fn from_detail(d: IdeaDetail, show_spam: bool) -> Self {
        Self {
            author: IdeaAuthorDto {
                avatar: gravatar_url(&d.author_email),
                id: d.user_id,
                name: d.author_name,
            },
            category: IdeaCategoryDto {
                id: d.category_id,
                name: d.category_name,
            },
            status: IdeaStatusDto {
                id: d.status_id,
                name: d.status_name,
                classes: d.status_classes,
            },
            spam_reports: show_spam.then_some(d.spam_reports),
            id: d.id,
            title: d.title,
            slug: d.slug,
            description: d.description,
            votes_count: d.votes_count,
            voted_by_user: d.voted_by_user,
            created_at: d.created_at,
        }
    }
}

/// Spam counter after a spam operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpamReportDto {
    pub spam_reports: i32,
}
