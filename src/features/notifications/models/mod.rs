pub mod notification_job;

pub use notification_job::{NotificationJob, NotificationJobStatus, NotifyVotersJob, Recipient};
