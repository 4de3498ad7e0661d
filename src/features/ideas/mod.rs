//! Ideas: submission, listing, status workflow, spam triage and deletion.

pub mod dtos;
pub mod events;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
