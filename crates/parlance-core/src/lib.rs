//! Business logic and adapter trait definitions for Parlance.
//!
//! This crate defines the "ports" (backend adapter and history store traits)
//! that the infrastructure layer implements, plus the chat orchestrator that
//! drives a request from history load through streaming to the final commit.
//! It depends only on `parlance-types` -- never on `parlance-infra` or any
//! database/HTTP crate.

pub mod backend;
pub mod chat;
pub mod history;
