//! Backend adapter abstractions.
//!
//! [`ChatBackend`](adapter::ChatBackend) is the capability interface every
//! model backend implements; [`BoxBackend`](box_adapter::BoxBackend) erases
//! the concrete type for runtime selection; [`BackendRouter`](router::BackendRouter)
//! picks a backend per request from the model id's routing prefix; and
//! [`bridge`] moves blocking iterators into the async domain.

pub mod adapter;
pub mod box_adapter;
pub mod bridge;
pub mod router;
