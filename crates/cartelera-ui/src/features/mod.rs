//! Feature modules: catalog browsing, filters and provider subscriptions.

pub mod catalog;
pub mod filters;
pub mod providers;
