//! State store, render scheduling and pure helpers.

pub mod logic;
pub mod render;
pub mod store;
