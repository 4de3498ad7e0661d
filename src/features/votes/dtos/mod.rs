pub mod vote_dto;

pub use vote_dto::VoteStateDto;
