use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of casting a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Added,
    /// The pair already had a vote; nothing changed
    AlreadyExists,
}

/// Result of withdrawing a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnvoteOutcome {
    Removed,
    /// The pair had no vote; nothing changed
    NotFound,
}
