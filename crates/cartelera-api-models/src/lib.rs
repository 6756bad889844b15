#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, missing_debug_implementations)]
//! Shared HTTP DTOs for the Cartelera catalog API.
//!
//! These types mirror the wire shapes served by the addon's TMDB proxy
//! (`/api/tmdb/...`). The client never mutates catalog entities; it only
//! deserializes them and derives display state, so everything here is plain
//! data with a handful of read-only helpers. Dates stay strings on the wire
//! and are parsed where the UI needs them.

use serde::{Deserialize, Serialize};

/// The two catalog partitions served by the upstream API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaKind {
    /// Movie catalog.
    Movies,
    /// TV series catalog.
    Series,
}

impl MediaKind {
    /// Path segment used by list endpoints (`/discover/movies`, `/trending/tv`, ...).
    #[must_use]
    pub const fn list_segment(self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Series => "tv",
        }
    }

    /// Path segment used by detail and per-title provider endpoints
    /// (`/movie/{id}`, `/{id}/watch/providers/tv`).
    #[must_use]
    pub const fn detail_segment(self) -> &'static str {
        match self {
            Self::Movies => "movie",
            Self::Series => "tv",
        }
    }

    /// Value accepted by the favorites toggle endpoint's `mediaType` parameter.
    #[must_use]
    pub const fn favorite_param(self) -> &'static str {
        self.detail_segment()
    }
}

/// One catalog entry as returned by list, search and detail endpoints.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`;
/// both shapes deserialize into this struct and [`CatalogItem::display_title`]
/// / [`CatalogItem::release_date`] pick whichever side is present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Upstream numeric identifier.
    pub id: i64,
    /// Movie title, absent for series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Series name, absent for movies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Synopsis text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster image path fragment (joined with the image CDN base).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Movie release date as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Series first-air date as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    /// Average vote on a 0–10 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Media type discriminator on mixed search results (`movie` or `tv`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl CatalogItem {
    /// Display title regardless of catalog partition.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Release date regardless of catalog partition.
    #[must_use]
    pub fn release_date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
    }

    /// Kind of a mixed search result, defaulting to movies when the
    /// discriminator is missing.
    #[must_use]
    pub fn search_kind(&self) -> MediaKind {
        match self.media_type.as_deref() {
            Some("tv") => MediaKind::Series,
            _ => MediaKind::Movies,
        }
    }
}

fn default_total_pages() -> u32 {
    1
}

/// One page of catalog results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Entries for the requested page.
    #[serde(default)]
    pub results: Vec<CatalogItem>,
    /// Total number of pages for the request.
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

impl Default for CatalogPage {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total_pages: 1,
        }
    }
}

/// A watch provider entry, used both for the full directory and for the
/// subscription payload (`POST /providers/subscribe` sends exactly these
/// three fields).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Upstream provider identifier.
    pub provider_id: i64,
    /// Display name.
    pub provider_name: String,
    /// Logo image path fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
}

/// Season/episode tree served by `GET /series/{id}` for the download picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDetail {
    /// Series title.
    pub title: String,
    /// Full poster URL (already joined server-side).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// First-air date as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Seasons in airing order.
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// One season of a series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Season number as aired.
    pub number: u32,
    /// Episodes in airing order.
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// One episode of a season.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Identifier accepted by the download endpoint.
    pub id: i64,
    /// Episode number within the season.
    pub number: u32,
    /// Episode title.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_and_series_titles_resolve() {
        let movie: CatalogItem = serde_json::from_str(
            r#"{"id":5,"title":"Dune","release_date":"2021-09-15","vote_average":7.9}"#,
        )
        .unwrap();
        assert_eq!(movie.display_title(), "Dune");
        assert_eq!(movie.release_date(), Some("2021-09-15"));
        assert_eq!(movie.search_kind(), MediaKind::Movies);

        let series: CatalogItem = serde_json::from_str(
            r#"{"id":9,"name":"Dark","first_air_date":"2017-12-01","media_type":"tv"}"#,
        )
        .unwrap();
        assert_eq!(series.display_title(), "Dark");
        assert_eq!(series.release_date(), Some("2017-12-01"));
        assert_eq!(series.search_kind(), MediaKind::Series);
    }

    #[test]
    fn page_defaults_apply_when_fields_missing() {
        let page: CatalogPage = serde_json::from_str(r"{}").unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn provider_entry_round_trips_subscription_payload() {
        let entry = ProviderEntry {
            provider_id: 8,
            provider_name: "Netflix".into(),
            logo_path: Some("/n.png".into()),
        };
        let body = serde_json::to_string(&vec![entry.clone()]).unwrap();
        assert!(body.contains("\"provider_id\":8"));
        assert!(body.contains("\"provider_name\":\"Netflix\""));
        let parsed: Vec<ProviderEntry> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, vec![entry]);
    }

    #[test]
    fn series_detail_parses_camel_case_tree() {
        let detail: SeriesDetail = serde_json::from_str(
            r#"{
                "title": "Dark",
                "posterUrl": "https://img/p.jpg",
                "releaseDate": "2017-12-01",
                "seasons": [
                    {"number": 1, "episodes": [{"id": 11, "number": 1, "title": "Secretos"}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(detail.poster_url.as_deref(), Some("https://img/p.jpg"));
        assert_eq!(detail.seasons[0].episodes[0].id, 11);
    }

    #[test]
    fn kind_segments_match_upstream_paths() {
        assert_eq!(MediaKind::Movies.list_segment(), "movies");
        assert_eq!(MediaKind::Series.list_segment(), "tv");
        assert_eq!(MediaKind::Movies.detail_segment(), "movie");
        assert_eq!(MediaKind::Series.detail_segment(), "tv");
    }
}
