//! Repository traits (ports) for the relational store.
//!
//! Services depend on these traits only. `postgres` provides the production
//! implementation; tests run the same services against `memory`.
//!
//! Uniqueness lives in the store: inserting a duplicate slug or email
//! yields `AppError::Conflict`, and a duplicate vote reports `false`
//! instead of inserting a second row.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::ideas::models::{Idea, IdeaDetail, IdeaFilter, NewIdea};
use crate::features::notifications::models::{
    NotificationJob, NotificationJobStatus, NotifyVotersJob,
};
use crate::features::statuses::models::{Status, StatusCount};
use crate::features::users::models::{NewUser, User};

pub mod postgres;

#[cfg(test)]
pub mod memory;

// ============================================================================
// Users
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; `Conflict` if the email is taken
    async fn create(&self, user: &NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

// ============================================================================
// Reference data
// ============================================================================

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;
}

#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// All statuses in display order
    async fn list(&self) -> Result<Vec<Status>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Status>>;

    /// Idea count per referenced status; statuses with no ideas are absent
    async fn idea_counts(&self) -> Result<Vec<StatusCount>>;
}

// ============================================================================
// Ideas
// ============================================================================

#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// Insert an idea; `Conflict` if the slug is taken
    async fn insert(&self, idea: &NewIdea) -> Result<Idea>;

    /// Slugs equal to `base` or starting with `base-`
    async fn slugs_with_base(&self, base: &str) -> Result<Vec<String>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Idea>>;

    async fn find_detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Option<IdeaDetail>>;

    /// One page of ideas, newest first, plus the total matching the filter
    async fn list(
        &self,
        filter: &IdeaFilter,
        viewer: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<IdeaDetail>, i64)>;

    async fn update_status(&self, id: Uuid, status_id: Uuid) -> Result<()>;

    /// Add one spam report and return the new counter
    async fn increment_spam(&self, id: Uuid) -> Result<i32>;

    async fn reset_spam(&self, id: Uuid) -> Result<()>;

    /// Delete an idea together with its votes; false if it did not exist
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// ============================================================================
// Votes
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Record a vote; false if the pair already had one
    async fn insert(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool>;

    /// Remove a vote; false if the pair had none
    async fn delete(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool>;

    async fn exists(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool>;

    async fn count(&self, idea_id: Uuid) -> Result<i64>;

    /// Distinct users who voted for the idea
    async fn voters(&self, idea_id: Uuid) -> Result<Vec<User>>;
}

// ============================================================================
// Notification jobs
// ============================================================================

#[async_trait]
pub trait NotificationJobRepository: Send + Sync {
    async fn create(&self, job: &NotifyVotersJob) -> Result<NotificationJob>;

    /// Oldest pending jobs that still have retries left
    async fn fetch_pending(&self, max_retries: i32, batch_size: i64)
        -> Result<Vec<NotificationJob>>;

    async fn update_status(&self, id: Uuid, status: NotificationJobStatus) -> Result<()>;

    async fn mark_completed(&self, id: Uuid) -> Result<()>;

    /// Record a failed attempt with the job's next status and retry count
    async fn mark_failed(
        &self,
        id: Uuid,
        status: NotificationJobStatus,
        retry_count: i32,
        error_message: &str,
    ) -> Result<()>;
}
