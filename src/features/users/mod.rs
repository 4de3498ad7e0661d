//! Accounts.
//!
//! Users are created through the auth feature; this module holds the account
//! model, the explicit `Role` capability and the public profile DTO.

pub mod dtos;
pub mod models;
