//! HTTP request handlers for the gateway.

pub mod chat;
pub mod models;
pub mod session;
