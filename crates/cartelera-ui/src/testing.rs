//! Test doubles shared by the controller suites: a scriptable gateway and a
//! render target that records applied markup.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use cartelera_api_models::{
    CatalogItem, CatalogPage, Episode, MediaKind, ProviderEntry, Season, SeriesDetail,
};
use tokio::sync::oneshot;

use crate::core::render::{ComponentId, RenderTarget};
use crate::core::store::{AppliedFilters, Category};
use crate::error::{ClientError, ClientResult};
use crate::services::api::CatalogGateway;

/// Minimal catalog item for fixtures.
pub(crate) fn item(id: i64, title: &str) -> CatalogItem {
    CatalogItem {
        id,
        title: Some(title.to_string()),
        name: None,
        overview: None,
        poster_path: None,
        release_date: Some("2021-09-15".to_string()),
        first_air_date: None,
        vote_average: Some(7.5),
        media_type: None,
    }
}

/// One page of fixtures.
pub(crate) fn page(results: Vec<CatalogItem>, total_pages: u32) -> CatalogPage {
    CatalogPage {
        results,
        total_pages,
    }
}

/// A one-season series tree for the download picker.
pub(crate) fn series(title: &str) -> SeriesDetail {
    SeriesDetail {
        title: title.to_string(),
        poster_url: None,
        release_date: Some("2017-12-01".to_string()),
        seasons: vec![Season {
            number: 1,
            episodes: vec![Episode {
                id: 101,
                number: 1,
                title: "Secretos".to_string(),
            }],
        }],
    }
}

fn unscripted(endpoint: &str) -> ClientError {
    ClientError::Network {
        endpoint: endpoint.to_string(),
        detail: "no scripted response".to_string(),
    }
}

type Gated<T> = (Option<oneshot::Receiver<()>>, ClientResult<T>);

/// Scriptable [`CatalogGateway`]: responses are queued per method and popped
/// in call order. A gated catalog response does not resolve until its
/// [`oneshot::Sender`] fires, which lets tests order overlapping requests.
#[derive(Default)]
pub(crate) struct MockGateway {
    catalog: RefCell<VecDeque<Gated<CatalogPage>>>,
    catalog_pages: RefCell<Vec<u32>>,
    search: RefCell<VecDeque<ClientResult<CatalogPage>>>,
    search_calls: RefCell<Vec<(String, u32)>>,
    details: RefCell<VecDeque<ClientResult<CatalogItem>>>,
    title_providers: RefCell<VecDeque<ClientResult<Vec<ProviderEntry>>>>,
    directory: RefCell<VecDeque<ClientResult<Vec<ProviderEntry>>>>,
    subscribed: RefCell<VecDeque<ClientResult<Vec<ProviderEntry>>>>,
    saved: RefCell<Vec<Vec<ProviderEntry>>>,
    save_results: RefCell<VecDeque<ClientResult<()>>>,
    favorite_results: RefCell<VecDeque<Gated<()>>>,
    favorite_calls: RefCell<Vec<(i64, MediaKind, bool)>>,
    series: RefCell<VecDeque<ClientResult<SeriesDetail>>>,
    download_results: RefCell<VecDeque<ClientResult<()>>>,
    downloads: RefCell<Vec<i64>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_catalog(&self, response: ClientResult<CatalogPage>) {
        self.catalog.borrow_mut().push_back((None, response));
    }

    /// Queue a catalog response that resolves only after the returned sender
    /// fires.
    pub(crate) fn push_catalog_gated(
        &self,
        response: ClientResult<CatalogPage>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.catalog.borrow_mut().push_back((Some(rx), response));
        tx
    }

    pub(crate) fn push_search(&self, response: ClientResult<CatalogPage>) {
        self.search.borrow_mut().push_back(response);
    }

    pub(crate) fn push_detail(&self, response: ClientResult<CatalogItem>) {
        self.details.borrow_mut().push_back(response);
    }

    pub(crate) fn push_title_providers(&self, response: ClientResult<Vec<ProviderEntry>>) {
        self.title_providers.borrow_mut().push_back(response);
    }

    pub(crate) fn push_directory(&self, response: ClientResult<Vec<ProviderEntry>>) {
        self.directory.borrow_mut().push_back(response);
    }

    pub(crate) fn push_subscribed(&self, response: ClientResult<Vec<ProviderEntry>>) {
        self.subscribed.borrow_mut().push_back(response);
    }

    pub(crate) fn push_save_result(&self, response: ClientResult<()>) {
        self.save_results.borrow_mut().push_back(response);
    }

    pub(crate) fn push_favorite_result(&self, response: ClientResult<()>) {
        self.favorite_results.borrow_mut().push_back((None, response));
    }

    /// Queue a favorite POST result that resolves only after the returned
    /// sender fires, for ordering overlapping toggles.
    pub(crate) fn push_favorite_result_gated(
        &self,
        response: ClientResult<()>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.favorite_results
            .borrow_mut()
            .push_back((Some(rx), response));
        tx
    }

    pub(crate) fn push_series(&self, response: ClientResult<SeriesDetail>) {
        self.series.borrow_mut().push_back(response);
    }

    pub(crate) fn catalog_pages_requested(&self) -> Vec<u32> {
        self.catalog_pages.borrow().clone()
    }

    pub(crate) fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.borrow().clone()
    }

    pub(crate) fn favorite_calls(&self) -> Vec<(i64, MediaKind, bool)> {
        self.favorite_calls.borrow().clone()
    }

    pub(crate) fn saved_providers(&self) -> Vec<Vec<ProviderEntry>> {
        self.saved.borrow().clone()
    }

    pub(crate) fn download_calls(&self) -> Vec<i64> {
        self.downloads.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CatalogGateway for MockGateway {
    async fn fetch_catalog_page(
        &self,
        _category: Category,
        _kind: MediaKind,
        _applied: &AppliedFilters,
        _sort: &str,
        page: u32,
    ) -> ClientResult<CatalogPage> {
        self.catalog_pages.borrow_mut().push(page);
        let next = self.catalog.borrow_mut().pop_front();
        match next {
            Some((Some(gate), response)) => {
                let _ = gate.await;
                response
            }
            Some((None, response)) => response,
            None => Err(unscripted("catalog")),
        }
    }

    async fn search_titles(&self, query: &str, page: u32) -> ClientResult<CatalogPage> {
        self.search_calls
            .borrow_mut()
            .push((query.to_string(), page));
        self.search
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("search")))
    }

    async fn fetch_title_detail(&self, _kind: MediaKind, _id: i64) -> ClientResult<CatalogItem> {
        self.details
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("detail")))
    }

    async fn fetch_title_providers(
        &self,
        _kind: MediaKind,
        _id: i64,
    ) -> ClientResult<Vec<ProviderEntry>> {
        self.title_providers
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_provider_directory(&self, _kind: MediaKind) -> ClientResult<Vec<ProviderEntry>> {
        self.directory
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_subscribed_providers(&self) -> ClientResult<Vec<ProviderEntry>> {
        self.subscribed
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn save_subscribed_providers(&self, providers: &[ProviderEntry]) -> ClientResult<()> {
        self.saved.borrow_mut().push(providers.to_vec());
        self.save_results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn set_favorite(&self, id: i64, kind: MediaKind, favorite: bool) -> ClientResult<()> {
        self.favorite_calls.borrow_mut().push((id, kind, favorite));
        let next = self.favorite_results.borrow_mut().pop_front();
        match next {
            Some((Some(gate), response)) => {
                let _ = gate.await;
                response
            }
            Some((None, response)) => response,
            None => Ok(()),
        }
    }

    async fn fetch_series_detail(&self, _id: i64) -> ClientResult<SeriesDetail> {
        self.series
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("series")))
    }

    async fn request_download(&self, id: i64) -> ClientResult<()> {
        self.downloads.borrow_mut().push(id);
        self.download_results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// [`RenderTarget`] that records every applied (component, markup) pair.
#[derive(Debug, Default)]
pub(crate) struct RecordingTarget {
    applied: RefCell<Vec<(ComponentId, String)>>,
}

impl RecordingTarget {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Markup most recently applied to `component`, if any.
    pub(crate) fn last_for(&self, component: ComponentId) -> Option<String> {
        self.applied
            .borrow()
            .iter()
            .rev()
            .find(|(id, _)| *id == component)
            .map(|(_, markup)| markup.clone())
    }

    /// Number of paints applied to `component`.
    pub(crate) fn count_for(&self, component: ComponentId) -> usize {
        self.applied
            .borrow()
            .iter()
            .filter(|(id, _)| *id == component)
            .count()
    }
}

impl RenderTarget for RecordingTarget {
    fn apply(&self, component: ComponentId, markup: &str) -> crate::error::ClientResult<()> {
        self.applied
            .borrow_mut()
            .push((component, markup.to_string()));
        Ok(())
    }
}
