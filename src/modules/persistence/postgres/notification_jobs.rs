use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::notifications::models::{
    NotificationJob, NotificationJobStatus, NotifyVotersJob,
};
use crate::modules::persistence::NotificationJobRepository;

const JOB_COLUMNS: &str = r#"
    id, idea_id, idea_title, idea_slug, status_name, recipients,
    status, retry_count, error_message, created_at, processed_at, last_attempt_at
"#;

#[derive(Clone)]
pub struct PgNotificationJobRepository {
    pool: PgPool,
}

impl PgNotificationJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationJobRepository for PgNotificationJobRepository {
    async fn create(&self, job: &NotifyVotersJob) -> Result<NotificationJob> {
        let sql = format!(
            r#"
            INSERT INTO notification_jobs
                (id, idea_id, idea_title, idea_slug, status_name, recipients, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        sqlx::query_as::<_, NotificationJob>(&sql)
            .bind(Uuid::now_v7())
            .bind(job.idea_id)
            .bind(&job.idea_title)
            .bind(&job.idea_slug)
            .bind(&job.status_name)
            .bind(Json(&job.recipients))
            .bind(NotificationJobStatus::Pending)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create notification job: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn fetch_pending(
        &self,
        max_retries: i32,
        batch_size: i64,
    ) -> Result<Vec<NotificationJob>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM notification_jobs
            WHERE status = 'pending'
            AND retry_count < $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
            JOB_COLUMNS
        );

        sqlx::query_as::<_, NotificationJob>(&sql)
            .bind(max_retries)
            .bind(batch_size)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch pending notification jobs: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_status(&self, id: Uuid, status: NotificationJobStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_jobs
            SET status = $2, last_attempt_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update notification job status: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_jobs
            SET status = $2, processed_at = NOW(), last_attempt_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(NotificationJobStatus::Completed)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notification job as completed: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        status: NotificationJobStatus,
        retry_count: i32,
        error_message: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_jobs
            SET status = $2, error_message = $3, retry_count = $4, last_attempt_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(error_message)
        .bind(retry_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notification job as failed: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }
}
