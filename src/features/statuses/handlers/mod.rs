pub mod status_handler;

pub use status_handler::{__path_list_statuses, __path_status_counts, list_statuses, status_counts};
