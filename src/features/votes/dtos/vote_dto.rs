use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Vote state of an idea for the caller, after a vote operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteStateDto {
    pub voted: bool,
    pub votes_count: i64,
}
