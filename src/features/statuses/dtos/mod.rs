pub mod status_dto;

pub use status_dto::{StatusCountDto, StatusCountsDto, StatusResponseDto};
