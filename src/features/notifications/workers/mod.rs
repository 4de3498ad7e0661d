pub mod notify_voters;

pub use notify_voters::{NotifySettings, NotifyVotersWorker};
