use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a workflow status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Status {
    pub id: Uuid,
    pub name: String,
    /// Display style token rendered by the frontend
    pub classes: String,
    pub display_order: i32,
}

/// Number of ideas currently in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct StatusCount {
    pub status_id: Uuid,
    pub count: i64,
}
