pub mod auth;
pub mod categories;
pub mod ideas;
pub mod notifications;
pub mod statuses;
pub mod users;
pub mod votes;
