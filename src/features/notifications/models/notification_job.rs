use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Notification job status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "notification_job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for NotificationJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationJobStatus::Pending => write!(f, "pending"),
            NotificationJobStatus::Processing => write!(f, "processing"),
            NotificationJobStatus::Completed => write!(f, "completed"),
            NotificationJobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One person to notify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

/// Database model for a queued "notify all voters" job
#[derive(Debug, Clone, FromRow)]
pub struct NotificationJob {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub idea_title: String,
    pub idea_slug: String,
    pub status_name: String,
    pub recipients: Json<Vec<Recipient>>,
    pub status: NotificationJobStatus,
    pub retry_count: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

/// Payload enqueued when an admin changes status with "notify voters" on.
///
/// Idea fields are a snapshot taken at enqueue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyVotersJob {
    pub idea_id: Uuid,
    pub idea_title: String,
    pub idea_slug: String,
    pub status_name: String,
    pub recipients: Vec<Recipient>,
}
