//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the relational store and the outbound mail transport.

pub mod mail;
pub mod persistence;
