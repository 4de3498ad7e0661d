//! Voter notifications.
//!
//! Status changes enqueue a job row; `NotifyVotersWorker` polls the queue and
//! mails every recipient, retrying failed jobs a bounded number of times.

pub mod models;
pub mod services;
pub mod workers;
