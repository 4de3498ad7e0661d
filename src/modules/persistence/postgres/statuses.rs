use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::statuses::models::{Status, StatusCount};
use crate::modules::persistence::StatusRepository;

#[derive(Clone)]
pub struct PgStatusRepository {
    pool: PgPool,
}

impl PgStatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusRepository for PgStatusRepository {
    async fn list(&self) -> Result<Vec<Status>> {
        sqlx::query_as::<_, Status>(
            r#"
            SELECT id, name, classes, display_order
            FROM statuses
            ORDER BY display_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list statuses: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Status>> {
        sqlx::query_as::<_, Status>(
            r#"
            SELECT id, name, classes, display_order
            FROM statuses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get status: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn idea_counts(&self) -> Result<Vec<StatusCount>> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status_id, COUNT(*) AS count
            FROM ideas
            GROUP BY status_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count ideas by status: {:?}", e);
            AppError::Database(e)
        })
    }
}
