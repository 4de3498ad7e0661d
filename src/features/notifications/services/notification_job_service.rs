use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::notifications::models::{
    NotificationJob, NotificationJobStatus, NotifyVotersJob,
};
use crate::modules::persistence::NotificationJobRepository;

/// Durable queue of "notify voters" jobs
pub struct NotificationJobService {
    jobs: Arc<dyn NotificationJobRepository>,
}

impl NotificationJobService {
    pub fn new(jobs: Arc<dyn NotificationJobRepository>) -> Self {
        Self { jobs }
    }

    /// Persist a job for the background worker
    pub async fn enqueue(&self, job: &NotifyVotersJob) -> Result<NotificationJob> {
        let created = self.jobs.create(job).await?;
        tracing::info!(
            job_id = %created.id,
            idea_id = %job.idea_id,
            recipients = job.recipients.len(),
            "Notification job enqueued"
        );
        Ok(created)
    }

    /// Fetch pending jobs that haven't exhausted their retries
    pub async fn fetch_pending(
        &self,
        max_retries: i32,
        batch_size: i64,
    ) -> Result<Vec<NotificationJob>> {
        self.jobs.fetch_pending(max_retries, batch_size).await
    }

    pub async fn update_status(&self, job_id: Uuid, status: NotificationJobStatus) -> Result<()> {
        self.jobs.update_status(job_id, status).await
    }

    pub async fn mark_completed(&self, job_id: Uuid) -> Result<()> {
        self.jobs.mark_completed(job_id).await?;
        tracing::info!("Notification job {} marked as completed", job_id);
        Ok(())
    }

    /// Record a failed attempt; the job goes back to pending until
    /// `max_retries` attempts have failed, then stays failed
    pub async fn mark_failed(
        &self,
        job_id: Uuid,
        current_retry_count: i32,
        max_retries: i32,
        error_message: &str,
    ) -> Result<()> {
        let new_retry_count = current_retry_count + 1;
        let new_status = if new_retry_count >= max_retries {
            NotificationJobStatus::Failed
        } else {
            NotificationJobStatus::Pending
        };

        self.jobs
            .mark_failed(job_id, new_status, new_retry_count, error_message)
            .await?;

        if new_status == NotificationJobStatus::Failed {
            tracing::warn!(
                "Notification job {} permanently failed after {} retries",
                job_id,
                max_retries
            );
        } else {
            tracing::info!(
                "Notification job {} marked for retry ({}/{})",
                job_id,
                new_retry_count,
                max_retries
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::models::Recipient;
    use crate::modules::persistence::memory::MemoryStore;

    fn job() -> NotifyVotersJob {
        NotifyVotersJob {
            idea_id: Uuid::now_v7(),
            idea_title: "Dark mode".to_string(),
            idea_slug: "dark-mode".to_string(),
            status_name: "In Progress".to_string(),
            recipients: vec![Recipient {
                email: "ann@example.com".to_string(),
                name: "Ann".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_failed_job_is_retried_then_gives_up() {
        let store = Arc::new(MemoryStore::seeded());
        let service = NotificationJobService::new(store.clone());
        let created = service.enqueue(&job()).await.unwrap();

        service
            .mark_failed(created.id, 0, 2, "relay down")
            .await
            .unwrap();
        let pending = service.fetch_pending(2, 10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].retry_count, 1);
        assert_eq!(pending[0].error_message.as_deref(), Some("relay down"));

        service
            .mark_failed(created.id, 1, 2, "relay still down")
            .await
            .unwrap();
        assert!(service.fetch_pending(2, 10).await.unwrap().is_empty());
        assert_eq!(store.jobs()[0].status, NotificationJobStatus::Failed);
    }

    #[tokio::test]
    async fn test_completed_job_is_not_fetched_again() {
        let store = Arc::new(MemoryStore::seeded());
        let service = NotificationJobService::new(store.clone());
        let created = service.enqueue(&job()).await.unwrap();

        service.mark_completed(created.id).await.unwrap();

        assert!(service.fetch_pending(3, 10).await.unwrap().is_empty());
        assert!(store.jobs()[0].processed_at.is_some());
    }
}
