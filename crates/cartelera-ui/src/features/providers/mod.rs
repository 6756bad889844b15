//! Watch-provider directory, the subscribed-operators strip and its editor.

pub mod state;
pub mod view;

pub use state::{directory_union, load_directory, load_subscribed, subscribed_entries};
