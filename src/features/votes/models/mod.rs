pub mod vote;

pub use vote::{UnvoteOutcome, VoteOutcome};
