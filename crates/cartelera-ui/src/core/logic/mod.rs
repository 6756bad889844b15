//! Pure helpers shared by controllers, gateway and views, testable off-wasm.

use cartelera_api_models::MediaKind;
use chrono::{Datelike, NaiveDate};

use crate::core::store::Category;

/// Hard cap on requested pages; the upstream API rejects anything beyond it.
pub const MAX_PAGE: u32 = 500;

/// Image CDN base for poster and logo paths.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Placeholder shown when a title has no poster.
pub const DEFAULT_IMAGE: &str = "https://via.placeholder.com/220x330?text=No+Image";

/// Clamp a requested page into `[1, MAX_PAGE]` before dispatch.
#[must_use]
pub const fn clamp_requested_page(page: u32) -> u32 {
    if page < 1 {
        1
    } else if page > MAX_PAGE {
        MAX_PAGE
    } else {
        page
    }
}

/// Inclusive range of numbered pagination buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    /// First numbered button.
    pub start: u32,
    /// Last numbered button.
    pub end: u32,
}

/// Window of numbered buttons centered on the current page.
#[must_use]
pub fn pagination_window(total_pages: u32, current_page: u32, window_size: u32) -> PageWindow {
    let start = current_page.saturating_sub(window_size / 2).max(1);
    let end = (start + window_size.saturating_sub(1)).min(total_pages.max(1));
    PageWindow { start, end }
}

/// Exponential backoff delay for GET retries, capped at two seconds.
#[must_use]
pub fn backoff_delay_ms(attempt: u32) -> u32 {
    let delay = 200_u32.saturating_mul(2_u32.saturating_pow(attempt.min(4)));
    delay.clamp(200, 2_000)
}

/// Join a query string from key/value pairs, skipping absent values and
/// percent-encoding the rest. Returns an empty string when nothing is set.
#[must_use]
pub fn build_query(params: &[(&str, Option<String>)]) -> String {
    params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|value| format!("{key}={}", urlencoding::encode(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Join the API base with an endpoint path, normalizing the slash between.
#[must_use]
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Spanish category label for headings.
#[must_use]
pub const fn category_label(category: Category) -> &'static str {
    match category {
        Category::Popular => "Populares",
        Category::Trending => "Tendencias",
        Category::Favorites => "Favoritos",
    }
}

/// Heading for a browse view, e.g. `Populares Películas`.
#[must_use]
pub fn page_title(category: Category, kind: MediaKind) -> String {
    let noun = match kind {
        MediaKind::Movies => "Películas",
        MediaKind::Series => "Series",
    };
    format!("{} {noun}", category_label(category))
}

/// Heading shown while search results are displayed.
#[must_use]
pub const fn search_title() -> &'static str {
    "Resultados de la busqueda"
}

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long-form Spanish date (`15 de septiembre de 2021`) from a wire date,
/// falling back to `Sin fecha` when absent or unparseable.
#[must_use]
pub fn format_release_date(raw: Option<&str>) -> String {
    raw.and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .map_or_else(
            || "Sin fecha".to_string(),
            |date| {
                let month = MONTHS_ES[date.month0() as usize];
                format!("{:02} de {month} de {}", date.day(), date.year())
            },
        )
}

/// Vote average (0–10) as a rounded percentage for the popularity dial.
#[must_use]
pub fn popularity_percent(vote_average: Option<f64>) -> u32 {
    let percent = (vote_average.unwrap_or(0.0) * 10.0).round();
    if percent <= 0.0 {
        0
    } else if percent >= 100.0 {
        100
    } else {
        // Bounds checked above, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            percent as u32
        }
    }
}

/// Full poster URL at the given CDN size, with placeholder fallback.
#[must_use]
pub fn poster_url(poster_path: Option<&str>, size: &str) -> String {
    poster_path.map_or_else(
        || DEFAULT_IMAGE.to_string(),
        |path| format!("{IMAGE_BASE_URL}/{size}{path}"),
    )
}
