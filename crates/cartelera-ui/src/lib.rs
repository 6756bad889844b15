#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, missing_debug_implementations)]
//! Cartelera web client core.
//!
//! Everything that gives this client its behavior lives here: the single
//! [`core::store::StateStore`] holding UI state as copy-on-write snapshots,
//! the coalescing [`core::render::RenderScheduler`], the
//! [`services::api::CatalogGateway`] seam over the catalog HTTP API, and the
//! content/filter controllers that orchestrate browsing, search, pagination,
//! favorites and downloads. The DOM itself is an opaque render target: views
//! are pure functions from state to markup, and only the wasm-gated `app`
//! module touches `web-sys`.

pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod services;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;
