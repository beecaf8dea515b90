//! Session history port.

pub mod store;
