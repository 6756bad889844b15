//! Outbound service clients.

pub mod api;
