pub mod idea_dto;

pub use idea_dto::{
    CreateIdeaDto, IdeaAuthorDto, IdeaCategoryDto, IdeaListQuery, IdeaResponseDto, IdeaStatusDto,
    SetStatusDto, SpamReportDto,
};
