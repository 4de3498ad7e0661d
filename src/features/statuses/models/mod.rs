pub mod status;

pub use status::{Status, StatusCount};
