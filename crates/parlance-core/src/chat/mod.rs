//! Chat orchestration.

pub mod service;
