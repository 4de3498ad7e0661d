use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::interval;

use crate::core::config::{AppConfig, NotificationConfig};
use crate::core::error::AppError;
use crate::features::notifications::models::{NotificationJob, NotificationJobStatus};
use crate::features::notifications::services::NotificationJobService;
use crate::modules::mail::{MailError, MailMessage, Mailer};
use crate::shared::templates::{render_idea_status_updated, IdeaStatusMail, TemplateError};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Worker settings assembled from app and notification config
#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub app_name: String,
    pub frontend_url: String,
    pub from_address: String,
    pub poll_interval: Duration,
    pub batch_size: i64,
    pub max_retries: i32,
}

impl NotifySettings {
    pub fn new(app: &AppConfig, notification: &NotificationConfig) -> Self {
        Self {
            app_name: app.app_name.clone(),
            frontend_url: app.frontend_url.clone(),
            from_address: notification.from_address.clone(),
            poll_interval: notification.poll_interval,
            batch_size: notification.batch_size,
            max_retries: notification.max_retries,
        }
    }

    fn idea_url(&self, slug: &str) -> String {
        format!("{}/ideas/{}", self.frontend_url, slug)
    }
}

/// Background worker delivering "idea status updated" mail to voters
pub struct NotifyVotersWorker {
    jobs: Arc<NotificationJobService>,
    mailer: Arc<dyn Mailer>,
    settings: NotifySettings,
}

impl NotifyVotersWorker {
    pub fn new(
        jobs: Arc<NotificationJobService>,
        mailer: Arc<dyn Mailer>,
        settings: NotifySettings,
    ) -> Self {
        Self {
            jobs,
            mailer,
            settings,
        }
    }

    /// Run the worker in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting notification worker (every {:?}, batch {})",
            self.settings.poll_interval,
            self.settings.batch_size
        );

        let mut interval = interval(self.settings.poll_interval);

        loop {
            interval.tick().await;

            if let Err(e) = self.process_batch().await {
                tracing::error!("Error processing notification batch: {:?}", e);
            }
        }
    }

    /// Process one batch of pending jobs; returns how many were picked up
    pub async fn process_batch(&self) -> Result<usize, AppError> {
        let jobs = self
            .jobs
            .fetch_pending(self.settings.max_retries, self.settings.batch_size)
            .await?;

        if jobs.is_empty() {
            return Ok(0);
        }

        tracing::info!("Processing {} pending notification jobs", jobs.len());

        for job in &jobs {
            if let Err(e) = self.process_job(job).await {
                tracing::error!("Failed to process notification job {}: {}", job.id, e);
                self.jobs
                    .mark_failed(
                        job.id,
                        job.retry_count,
                        self.settings.max_retries,
                        &e.to_string(),
                    )
                    .await?;
            }
        }

        Ok(jobs.len())
    }

    /// Send the mail to every recipient. A retry resends to all of them.
    async fn process_job(&self, job: &NotificationJob) -> Result<(), NotifyError> {
        self.jobs
            .update_status(job.id, NotificationJobStatus::Processing)
            .await?;

        let idea_url = self.settings.idea_url(&job.idea_slug);

        for recipient in job.recipients.iter() {
            let rendered = render_idea_status_updated(&IdeaStatusMail {
                app_name: &self.settings.app_name,
                idea_title: &job.idea_title,
                status_name: &job.status_name,
                idea_url: &idea_url,
                recipient_name: &recipient.name,
            })?;

            self.mailer
                .send(&MailMessage {
                    from: self.settings.from_address.clone(),
                    to: recipient.email.clone(),
                    subject: rendered.subject,
                    body: rendered.body,
                })
                .await?;
        }

        self.jobs.mark_completed(job.id).await?;

        tracing::info!(
            "Notification job {} delivered to {} voters of idea {}",
            job.id,
            job.recipients.len(),
            job.idea_id
        );

        Ok(())
    }
}
