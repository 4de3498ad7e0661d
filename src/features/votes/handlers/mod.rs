pub mod vote_handler;

pub use vote_handler::{__path_remove_vote, __path_vote, remove_vote, vote, VoteState};
