pub mod notification_job_service;

pub use notification_job_service::NotificationJobService;
