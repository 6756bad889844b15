//! Runtime configuration for the browser client.

use gloo::storage::{LocalStorage, Storage};

const BASE_URL_KEY: &str = "cartelera.apiBase";

/// API base URL: a `localStorage` override wins, otherwise the page origin
/// plus the default mount path.
pub(crate) fn api_base_url() -> String {
    if let Ok(base) = LocalStorage::get::<String>(BASE_URL_KEY) {
        let base = base.trim().trim_end_matches('/');
        if !base.is_empty() {
            return base.to_string();
        }
    }
    let origin = web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default();
    format!("{origin}/api/tmdb")
}
