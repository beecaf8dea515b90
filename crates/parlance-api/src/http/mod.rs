//! HTTP layer for the Parlance gateway.
//!
//! Axum-based surface: streaming chat, session management, backend
//! pass-throughs, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
