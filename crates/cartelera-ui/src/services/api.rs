//! Catalog API gateway: URL construction, retry and error normalization.
//!
//! Controllers talk to [`CatalogGateway`], a `?Send` async seam; the wasm
//! build wires in [`HttpCatalogGateway`] over `gloo-net`, native tests
//! substitute mocks. Idempotent GETs are retried with exponential backoff up
//! to a configurable attempt count; mutating POSTs are never retried, so a
//! flaky network cannot double-toggle a favorite or double-queue a download.

use std::future::Future;

use async_trait::async_trait;
use cartelera_api_models::{CatalogItem, CatalogPage, MediaKind, ProviderEntry, SeriesDetail};

use crate::core::logic::backoff_delay_ms;
use crate::core::store::{AppliedFilters, Category};
use crate::error::{ClientError, ClientResult};

/// Region parameter sent alongside provider filters.
pub const WATCH_REGION: &str = "ES";

/// Method class of a dispatched request, for retry purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestClass {
    /// Idempotent read; safe to re-send.
    Get,
    /// Mutating request; dispatched exactly once.
    Post,
}

/// Whether a failed request may be re-sent: transport failures always,
/// upstream failures only when server-side (5xx). Client errors are final.
#[must_use]
pub fn retryable(err: &ClientError) -> bool {
    match err {
        ClientError::Network { .. } => true,
        ClientError::Upstream { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Dispatch `send`, re-sending [`RequestClass::Get`] requests up to
/// `max_attempts` times with exponential backoff. `sleep` receives the delay
/// in milliseconds before each re-send. [`RequestClass::Post`] requests go
/// out exactly once regardless of the error.
pub async fn send_with_retry<T, F, Fut, S, SFut>(
    class: RequestClass,
    max_attempts: u32,
    mut send: F,
    mut sleep: S,
) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
    S: FnMut(u32) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut attempt = 0;
    loop {
        match send().await {
            Ok(value) => return Ok(value),
            Err(err)
                if class == RequestClass::Get
                    && attempt + 1 < max_attempts
                    && retryable(&err) =>
            {
                sleep(backoff_delay_ms(attempt)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Endpoint path for a browse request.
#[must_use]
pub fn catalog_path(category: Category, kind: MediaKind) -> String {
    let head = match category {
        Category::Popular => "discover",
        Category::Trending => "trending",
        Category::Favorites => "favorites",
    };
    format!("/{head}/{}", kind.list_segment())
}

/// Query parameters for a browse request. Absent filters are skipped; the
/// region parameter rides along only when a provider filter is present.
#[must_use]
pub fn catalog_params(
    applied: &AppliedFilters,
    sort: &str,
    page: u32,
) -> Vec<(&'static str, Option<String>)> {
    let providers = if applied.provider_ids.is_empty() {
        None
    } else {
        Some(
            applied
                .provider_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|"),
        )
    };
    vec![
        ("sort_by", Some(sort.to_string())),
        (
            "release_date.gte",
            applied.start_date.map(|date| date.to_string()),
        ),
        (
            "release_date.lte",
            applied.end_date.map(|date| date.to_string()),
        ),
        ("watch_region", providers.as_ref().map(|_| WATCH_REGION.to_string())),
        ("with_watch_providers", providers),
        ("page", Some(page.to_string())),
    ]
}

/// Browse endpoint with its query string attached.
#[must_use]
pub fn catalog_endpoint(
    category: Category,
    kind: MediaKind,
    applied: &AppliedFilters,
    sort: &str,
    page: u32,
) -> String {
    let query = crate::core::logic::build_query(&catalog_params(applied, sort, page));
    format!("{}?{query}", catalog_path(category, kind))
}

/// Search endpoint with its query string attached.
#[must_use]
pub fn search_endpoint(query: &str, page: u32) -> String {
    let params = crate::core::logic::build_query(&[
        ("query", Some(query.to_string())),
        ("page", Some(page.to_string())),
    ]);
    format!("/search?{params}")
}

/// Favorite toggle endpoint; the flag rides in the query string.
#[must_use]
pub fn favorite_endpoint(id: i64, kind: MediaKind, favorite: bool) -> String {
    format!(
        "/favorites?mediaId={id}&mediaType={}&favorite={favorite}",
        kind.favorite_param()
    )
}

/// Typed surface over the remote catalog service.
#[async_trait(?Send)]
pub trait CatalogGateway {
    /// Fetch one page of a browse view (`discover`/`trending`/`favorites`).
    async fn fetch_catalog_page(
        &self,
        category: Category,
        kind: MediaKind,
        applied: &AppliedFilters,
        sort: &str,
        page: u32,
    ) -> ClientResult<CatalogPage>;

    /// Free-text title search.
    async fn search_titles(&self, query: &str, page: u32) -> ClientResult<CatalogPage>;

    /// Detail payload for one title.
    async fn fetch_title_detail(&self, kind: MediaKind, id: i64) -> ClientResult<CatalogItem>;

    /// Watch providers carrying one title.
    async fn fetch_title_providers(
        &self,
        kind: MediaKind,
        id: i64,
    ) -> ClientResult<Vec<ProviderEntry>>;

    /// Full provider directory for one catalog partition.
    async fn fetch_provider_directory(&self, kind: MediaKind) -> ClientResult<Vec<ProviderEntry>>;

    /// Providers the user is subscribed to.
    async fn fetch_subscribed_providers(&self) -> ClientResult<Vec<ProviderEntry>>;

    /// Persist the subscribed provider tuples.
    async fn save_subscribed_providers(&self, providers: &[ProviderEntry]) -> ClientResult<()>;

    /// Toggle the favorite flag for a title.
    async fn set_favorite(&self, id: i64, kind: MediaKind, favorite: bool) -> ClientResult<()>;

    /// Season/episode tree for the series download picker.
    async fn fetch_series_detail(&self, id: i64) -> ClientResult<SeriesDetail>;

    /// Fire-and-forget torrent download for a movie or an episode id.
    async fn request_download(&self, id: i64) -> ClientResult<()>;
}

#[cfg(target_arch = "wasm32")]
pub use http::HttpCatalogGateway;

#[cfg(target_arch = "wasm32")]
mod http {
    use super::{
        CatalogGateway, Category, RequestClass, catalog_endpoint, favorite_endpoint,
        search_endpoint, send_with_retry,
    };
    use async_trait::async_trait;
    use cartelera_api_models::{
        CatalogItem, CatalogPage, MediaKind, ProviderEntry, SeriesDetail,
    };
    use gloo_net::http::Request;
    use gloo_timers::future::TimeoutFuture;
    use serde::de::DeserializeOwned;

    use crate::core::logic::join_url;
    use crate::core::store::AppliedFilters;
    use crate::error::{ClientError, ClientResult};

    const DEFAULT_ATTEMPTS: u32 = 3;

    /// `gloo-net` gateway implementation.
    #[derive(Clone, Debug)]
    pub struct HttpCatalogGateway {
        base_url: String,
        max_attempts: u32,
    }

    impl HttpCatalogGateway {
        /// Gateway against the given API base (e.g. `http://host/api/tmdb`).
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into(),
                max_attempts: DEFAULT_ATTEMPTS,
            }
        }

        async fn try_get(&self, endpoint: &str) -> ClientResult<gloo_net::http::Response> {
            let url = join_url(&self.base_url, endpoint);
            let response = Request::get(&url)
                .send()
                .await
                .map_err(|err| ClientError::Network {
                    endpoint: endpoint.to_string(),
                    detail: err.to_string(),
                })?;
            if response.ok() {
                Ok(response)
            } else {
                Err(ClientError::Upstream {
                    status: response.status(),
                    endpoint: endpoint.to_string(),
                })
            }
        }

        async fn try_post(&self, endpoint: &str) -> ClientResult<()> {
            let url = join_url(&self.base_url, endpoint);
            let response =
                Request::post(&url)
                    .send()
                    .await
                    .map_err(|err| ClientError::Network {
                        endpoint: endpoint.to_string(),
                        detail: err.to_string(),
                    })?;
            if response.ok() {
                Ok(())
            } else {
                Err(ClientError::Upstream {
                    status: response.status(),
                    endpoint: endpoint.to_string(),
                })
            }
        }

        async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
            let response = send_with_retry(
                RequestClass::Get,
                self.max_attempts,
                || self.try_get(endpoint),
                TimeoutFuture::new,
            )
            .await?;
            response
                .json::<T>()
                .await
                .map_err(|err| ClientError::Decode {
                    endpoint: endpoint.to_string(),
                    detail: err.to_string(),
                })
        }

        async fn post_empty(&self, endpoint: &str) -> ClientResult<()> {
            send_with_retry(
                RequestClass::Post,
                self.max_attempts,
                || self.try_post(endpoint),
                TimeoutFuture::new,
            )
            .await
        }
    }

    #[async_trait(?Send)]
    impl CatalogGateway for HttpCatalogGateway {
        async fn fetch_catalog_page(
            &self,
            category: Category,
            kind: MediaKind,
            applied: &AppliedFilters,
            sort: &str,
            page: u32,
        ) -> ClientResult<CatalogPage> {
            self.get_json(&catalog_endpoint(category, kind, applied, sort, page))
                .await
        }

        async fn search_titles(&self, query: &str, page: u32) -> ClientResult<CatalogPage> {
            self.get_json(&search_endpoint(query, page)).await
        }

        async fn fetch_title_detail(
            &self,
            kind: MediaKind,
            id: i64,
        ) -> ClientResult<CatalogItem> {
            self.get_json(&format!("/{}/{id}", kind.detail_segment()))
                .await
        }

        async fn fetch_title_providers(
            &self,
            kind: MediaKind,
            id: i64,
        ) -> ClientResult<Vec<ProviderEntry>> {
            self.get_json(&format!("/{id}/watch/providers/{}", kind.detail_segment()))
                .await
        }

        async fn fetch_provider_directory(
            &self,
            kind: MediaKind,
        ) -> ClientResult<Vec<ProviderEntry>> {
            self.get_json(&format!("/watch/providers/{}", kind.list_segment()))
                .await
        }

        async fn fetch_subscribed_providers(&self) -> ClientResult<Vec<ProviderEntry>> {
            self.get_json("/providers/subscribe").await
        }

        async fn save_subscribed_providers(
            &self,
            providers: &[ProviderEntry],
        ) -> ClientResult<()> {
            let endpoint = "/providers/subscribe";
            let url = join_url(&self.base_url, endpoint);
            let request = Request::post(&url).json(providers).map_err(|err| {
                ClientError::Decode {
                    endpoint: endpoint.to_string(),
                    detail: err.to_string(),
                }
            })?;
            let response = request.send().await.map_err(|err| ClientError::Network {
                endpoint: endpoint.to_string(),
                detail: err.to_string(),
            })?;
            if response.ok() {
                Ok(())
            } else {
                Err(ClientError::Upstream {
                    status: response.status(),
                    endpoint: endpoint.to_string(),
                })
            }
        }

        async fn set_favorite(&self, id: i64, kind: MediaKind, favorite: bool) -> ClientResult<()> {
            self.post_empty(&favorite_endpoint(id, kind, favorite)).await
        }

        async fn fetch_series_detail(&self, id: i64) -> ClientResult<SeriesDetail> {
            self.get_json(&format!("/series/{id}")).await
        }

        async fn request_download(&self, id: i64) -> ClientResult<()> {
            self.post_empty(&format!("/torrents/download/{id}")).await
        }
    }
}
