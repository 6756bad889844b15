//! Pure markup builders for the catalog views.
//!
//! Views are functions from state to markup strings; the wasm shell applies
//! them through the render target and wires interactivity off `data-*`
//! attributes by event delegation. Nothing here touches the DOM, so all of it
//! is exercised natively.

use cartelera_api_models::{CatalogItem, MediaKind, ProviderEntry, SeriesDetail};

use crate::core::logic::{
    format_release_date, pagination_window, popularity_percent, poster_url,
};
use crate::core::store::{FavoritesState, Pagination};
use crate::models::{Notice, NoticeKind};

/// Numbered buttons shown around the current page.
pub const PAGE_WINDOW_SIZE: u32 = 5;

/// Minimal HTML escaping for text sourced from the catalog.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn kind_attr(kind: MediaKind) -> &'static str {
    kind.list_segment()
}

/// Card grid for a browse view.
#[must_use]
pub fn content_cards(items: &[CatalogItem], kind: MediaKind, favorites: &FavoritesState) -> String {
    items
        .iter()
        .map(|item| content_card(item, kind, favorites.contains(kind, item.id)))
        .collect()
}

fn content_card(item: &CatalogItem, kind: MediaKind, is_favorite: bool) -> String {
    let popularity = popularity_percent(item.vote_average);
    let poster = poster_url(item.poster_path.as_deref(), "w220_and_h330_face");
    let date = format_release_date(item.release_date());
    let title = escape(item.display_title());
    let favorite_class = if is_favorite { "btn-danger" } else { "btn-dark" };
    format!(
        r#"<div class="col-md-2">
  <div class="card custom-card" data-id="{id}" data-kind="{kind}">
    <div class="card-img-top position-relative" data-action="detail">
      <img src="{poster}" alt="{title}">
      <div class="popularity-wrapper">
        <div class="popularity-graph" style="--value:{popularity};"></div>
        <span>{popularity}%</span>
      </div>
    </div>
    <div class="content"><p>{date}</p><br/></div>
    <div class="favorite-icon position-absolute bottom-0 end-0 m-2">
      <button class="btn btn-sm {favorite_class}" data-action="favorite"><i class="fas fa-heart"></i></button>
      <button class="btn btn-sm btn-primary" data-action="download"><i class="fas fa-download"></i></button>
    </div>
  </div>
</div>
"#,
        id = item.id,
        kind = kind_attr(kind),
    )
}

/// Horizontal result cards for search mode. Mixed results resolve their kind
/// from the `media_type` discriminator; since that can be absent, the
/// favorite affordance checks both favorite sets.
#[must_use]
pub fn search_result_cards(items: &[CatalogItem], favorites: &FavoritesState) -> String {
    items
        .iter()
        .map(|item| {
            let is_favorite = favorites.contains_any(item.id);
            let poster = poster_url(item.poster_path.as_deref(), "w220_and_h330_face");
            let title = escape(item.display_title());
            let date = format_release_date(item.release_date());
            let overview = escape(item.overview.as_deref().unwrap_or("Sin sinopsis disponible"));
            let favorite_class = if is_favorite { "btn-danger" } else { "btn-dark" };
            let favorite_label = if is_favorite {
                "Quitar de Favoritos"
            } else {
                "Agregar a Favoritos"
            };
            format!(
                r#"<div class="card mb-3 shadow-sm" data-id="{id}" data-kind="{kind}">
  <div class="row g-0 align-items-center">
    <div class="col-md-2"><img src="{poster}" class="img-fluid rounded-start search-result-image" alt="{title}"></div>
    <div class="col-md-9">
      <div class="card-body">
        <h5 class="card-title fw-bold">{title}</h5>
        <p class="card-text text-muted">{date}</p>
        <p class="card-text">{overview}</p>
        <button class="btn btn-sm {favorite_class} favorite-btn" data-action="favorite"><i class="fas fa-heart"></i> {favorite_label}</button>
      </div>
    </div>
  </div>
</div>
"#,
                id = item.id,
                kind = kind_attr(item.search_kind()),
            )
        })
        .collect()
}

/// Explicit empty-result message, distinct from "nothing fetched yet".
#[must_use]
pub fn no_results(query: &str) -> String {
    format!(
        r#"<p class="text-center">No se encontraron resultados para "{}".</p>"#,
        escape(query)
    )
}

fn page_button(label: &str, page: u32, disabled: bool, active: bool) -> String {
    let mut classes = String::from("page-item");
    if active {
        classes.push_str(" active");
    }
    if disabled {
        classes.push_str(" disabled");
    }
    format!(
        r#"<li class="{classes}"><button class="page-link" data-page="{page}">{label}</button></li>"#,
    )
}

/// Pagination strip: first/prev, the numbered window, next/last. Buttons
/// carry their target page in `data-page`; disabled entries are inert.
#[must_use]
pub fn pagination_controls(pagination: &Pagination) -> String {
    let Pagination {
        current_page,
        total_pages,
    } = *pagination;
    let window = pagination_window(total_pages, current_page, PAGE_WINDOW_SIZE);
    let at_start = current_page == 1;
    let at_end = current_page == total_pages;

    let mut markup = String::new();
    markup.push_str(&page_button("|&lt;&lt;", 1, at_start, false));
    markup.push_str(&page_button(
        "Anterior",
        current_page.saturating_sub(1).max(1),
        at_start,
        false,
    ));
    for page in window.start..=window.end {
        markup.push_str(&page_button(
            &page.to_string(),
            page,
            false,
            page == current_page,
        ));
    }
    markup.push_str(&page_button(
        "Siguiente",
        (current_page + 1).min(total_pages),
        at_end,
        false,
    ));
    markup.push_str(&page_button("&gt;&gt;|", total_pages, at_end, false));
    markup
}

/// Empty pagination strip (used when search confirms zero matches).
#[must_use]
pub fn empty_pagination() -> String {
    String::new()
}

/// Detail modal body for one title.
#[must_use]
pub fn detail_modal(item: &CatalogItem, providers: &[ProviderEntry]) -> String {
    let poster = poster_url(item.poster_path.as_deref(), "w500");
    let title = escape(item.display_title());
    let date = format_release_date(item.release_date());
    let overview = escape(item.overview.as_deref().unwrap_or_default());
    let providers_markup = if providers.is_empty() {
        r#"<p class="text-muted">No disponible en ninguna operadora.</p>"#.to_string()
    } else {
        providers
            .iter()
            .map(|provider| {
                let logo = poster_url(provider.logo_path.as_deref(), "w45");
                let name = escape(&provider.provider_name);
                format!(
                    r#"<div class="me-3 text-center"><img src="{logo}" alt="{name}" class="img-fluid mb-1"><p class="small">{name}</p></div>"#,
                )
            })
            .collect()
    };
    format!(
        r#"<div id="detail-image"><img src="{poster}" alt="{title}" class="img-fluid" style="max-width: 220px;"></div>
<h4 id="detail-title">{title}</h4>
<p id="detail-date">{date}</p>
<p id="detail-overview">{overview}</p>
<div id="detail-providers"><div class="d-flex">{providers_markup}</div></div>
"#,
    )
}

/// Season/episode picker for series downloads. Episode download buttons
/// carry the episode id in `data-episode-id`.
#[must_use]
pub fn series_modal(series: &SeriesDetail) -> String {
    let title = escape(&series.title);
    let date = format_release_date(series.release_date.as_deref());
    let poster = series.poster_url.as_deref().unwrap_or_default();
    let seasons = series
        .seasons
        .iter()
        .map(|season| {
            let episodes = season
                .episodes
                .iter()
                .map(|episode| {
                    format!(
                        r#"<div class="episode"><span>{number}. {title}</span><button class="btn btn-sm btn-primary" data-episode-id="{id}"><i class="fas fa-download"></i></button></div>"#,
                        number = episode.number,
                        title = escape(&episode.title),
                        id = episode.id,
                    )
                })
                .collect::<String>();
            format!(
                r#"<div class="season"><h6>Temporada {}</h6>{episodes}</div>"#,
                season.number
            )
        })
        .collect::<String>();
    format!(
        r#"<h5 id="seriesTitle">{title}</h5>
<img id="seriesPoster" src="{poster}" alt="{title}">
<p id="seriesReleaseDate">Fecha de estreno: {date}</p>
<div id="seasonsList">{seasons}</div>
"#,
    )
}

/// Transient notice markup.
#[must_use]
pub fn notice(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Info => "alert alert-info",
        NoticeKind::Error => "alert alert-danger",
    };
    format!(
        r#"<div class="{class}" role="alert" data-notice-id="{}">{}</div>"#,
        notice.id,
        escape(&notice.message)
    )
}
