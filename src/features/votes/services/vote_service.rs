use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::AuthenticatedUser;
use crate::features::users::models::User;
use crate::features::votes::models::{UnvoteOutcome, VoteOutcome};
use crate::modules::persistence::VoteRepository;

/// The vote ledger: at most one vote per (user, idea)
pub struct VoteService {
    votes: Arc<dyn VoteRepository>,
}

impl VoteService {
    pub fn new(votes: Arc<dyn VoteRepository>) -> Self {
        Self { votes }
    }

    /// Cast a vote. Voting twice is a no-op reported as `AlreadyExists`.
    pub async fn vote(&self, idea_id: Uuid, user: &AuthenticatedUser) -> Result<VoteOutcome> {
        let inserted = self.votes.insert(user.user_id, idea_id).await?;
        if inserted {
            tracing::debug!(user_id = %user.user_id, %idea_id, "Vote added");
            Ok(VoteOutcome::Added)
        } else {
            Ok(VoteOutcome::AlreadyExists)
        }
    }

    /// Withdraw a vote. Withdrawing a missing vote is reported as `NotFound`.
    pub async fn remove_vote(
        &self,
        idea_id: Uuid,
        user: &AuthenticatedUser,
    ) -> Result<UnvoteOutcome> {
        let removed = self.votes.delete(user.user_id, idea_id).await?;
        if removed {
            tracing::debug!(user_id = %user.user_id, %idea_id, "Vote removed");
            Ok(UnvoteOutcome::Removed)
        } else {
            Ok(UnvoteOutcome::NotFound)
        }
    }

    /// Whether the caller voted; always false for guests
    pub async fn is_voted_by_user(
        &self,
        idea_id: Uuid,
        user: Option<&AuthenticatedUser>,
    ) -> Result<bool> {
        match user {
            Some(user) => self.votes.exists(user.user_id, idea_id).await,
            None => Ok(false),
        }
    }

    pub async fn count_votes(&self, idea_id: Uuid) -> Result<i64> {
        self.votes.count(idea_id).await
    }

    /// Distinct users who voted for the idea
    pub async fn voters(&self, idea_id: Uuid) -> Result<Vec<User>> {
        self.votes.voters(idea_id).await
    }
}
