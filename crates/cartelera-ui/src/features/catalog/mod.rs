//! Catalog browsing, search, detail, favorites and downloads.

pub mod controller;
pub mod view;

pub use controller::ContentController;
