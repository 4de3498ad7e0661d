pub mod user;

pub use user::{gravatar_url, NewUser, Role, User};
