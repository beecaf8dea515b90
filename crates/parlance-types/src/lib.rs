//! Shared domain types for Parlance.
//!
//! This crate contains the domain types used across the gateway: turns and
//! chat requests, backend completion types, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
