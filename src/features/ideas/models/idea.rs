use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for idea
#[derive(Debug, Clone, FromRow)]
pub struct Idea {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub status_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub spam_reports: i32,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a new idea
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub status_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Idea joined with its category, status, author and vote tally
#[derive(Debug, Clone, FromRow)]
pub struct IdeaDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub status_id: Uuid,
    pub status_name: String,
    pub status_classes: String,
    pub spam_reports: i32,
    pub user_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
    pub votes_count: i64,
    /// Whether the viewing user has voted; always false for guests
    pub voted_by_user: bool,
}

/// Listing filter; `None` means no restriction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaFilter {
    pub status: Option<String>,
    pub category: Option<String>,
}
