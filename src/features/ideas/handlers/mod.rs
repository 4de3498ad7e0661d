pub mod event_handler;
pub mod idea_handler;

pub use event_handler::{__path_idea_events, idea_events};
pub use idea_handler::{
    __path_create_idea, __path_delete_idea, __path_get_idea, __path_list_ideas,
    __path_mark_as_not_spam, __path_mark_as_spam, __path_set_status, create_idea, delete_idea,
    get_idea, list_ideas, mark_as_not_spam, mark_as_spam, set_status,
};
