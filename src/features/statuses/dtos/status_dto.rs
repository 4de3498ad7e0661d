use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::statuses::models::Status;

/// Response DTO for a workflow status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponseDto {
    pub id: Uuid,
    pub name: String,
    pub classes: String,
    pub display_order: i32,
}

impl From<Status> for StatusResponseDto {
    fn from(s: Status) -> Self {
        Self {
            id: s.id,
            name: s.name,
            classes: s.classes,
            display_order: s.display_order,
        }
    }
}

/// Idea count for one status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountDto {
    pub id: Uuid,
    pub name: String,
    pub classes: String,
    pub count: i64,
}

/// Idea counts for every status plus the total
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountsDto {
    /// Number of ideas across all statuses
    pub all: i64,
    /// One entry per status in display order, including zero counts
    pub statuses: Vec<StatusCountDto>,
}

impl StatusCountsDto {
    /// Count for a status by name, `All` for the aggregate
    pub fn count_for(&self, name: &str) -> Option<i64> {
        if name == crate::shared::constants::ALL_STATUSES {
            return Some(self.all);
        }
        self.statuses.iter().find(|s| s.name == name).map(|s| s.count)
    }
}
