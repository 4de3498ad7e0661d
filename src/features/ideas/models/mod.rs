pub mod idea;

pub use idea::{Idea, IdeaDetail, IdeaFilter, NewIdea};
