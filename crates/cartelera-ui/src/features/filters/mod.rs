//! Filter panel: date range, provider operator filter, sort order and the
//! subscribed-operators editor.

pub mod controller;

pub use controller::{FilterController, FilterInputs, inputs_active};
