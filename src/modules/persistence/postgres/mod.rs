//! PostgreSQL implementations of the repository traits.

mod categories;
mod ideas;
mod notification_jobs;
mod statuses;
mod users;
mod votes;

pub use categories::PgCategoryRepository;
pub use ideas::PgIdeaRepository;
pub use notification_jobs::PgNotificationJobRepository;
pub use statuses::PgStatusRepository;
pub use users::PgUserRepository;
pub use votes::PgVoteRepository;

use crate::core::error::AppError;

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`
pub(crate) fn map_unique_violation<F>(e: sqlx::Error, on_unique: F) -> AppError
where
    F: FnOnce() -> AppError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    AppError::Database(e)
}
