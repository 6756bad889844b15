//! Orchestration of browsing, search, detail, favorites and downloads.
//!
//! The controller owns the "what is on screen" machine: a phase per logical
//! view (browse vs search) plus a request generation counter per view. Every
//! fetch captures the generation it was issued under and a response only
//! touches state when its generation is still current; anything else is
//! dropped as stale, so an old page can never overwrite a newer one after the
//! user paginated past it. Switching view modes bumps the other view's
//! counter, cancelling the effect of its in-flight request.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cartelera_api_models::{CatalogItem, MediaKind};

use crate::core::logic::{clamp_requested_page, page_title, search_title};
use crate::core::render::{ComponentId, RenderScheduler, RenderTarget};
use crate::core::store::{AppliedFilters, Category, Pagination, StateStore, StateUpdate};
use crate::error::{ClientError, ClientResult};
use crate::features::catalog::view;
use crate::models::{LoadOutcome, Notice, NoticeKind, ViewPhase};
use crate::services::api::CatalogGateway;

/// Result of an optimistic favorite toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum FavoriteOutcome {
    /// The flip stuck; the server confirmed it.
    Applied {
        /// Membership after the toggle.
        now_favorite: bool,
    },
    /// The POST failed; the flip was reverted and a notice shown.
    RolledBack,
}

/// Request bookkeeping for one logical view: the phase machine plus the
/// generation counter identifying the newest load.
#[derive(Debug, Default)]
struct ViewTrack {
    generation: Cell<u64>,
    phase: Cell<ViewPhase>,
    // Last phase reached outside Loading; where a failed load settles.
    resting: Cell<ViewPhase>,
}

impl ViewTrack {
    /// Start a load: bump the generation, enter `Loading`, and remember the
    /// phase a failure should settle back into.
    fn begin(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let prior = self.phase.replace(ViewPhase::Loading);
        if prior != ViewPhase::Loading {
            self.resting.set(prior);
        }
        generation
    }

    /// Invalidate whatever load is in flight for this view.
    fn supersede(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn displayed(&self) {
        self.phase.set(ViewPhase::Displayed);
        self.resting.set(ViewPhase::Displayed);
    }

    /// Settle a failed load: `Displayed` if this view ever showed content,
    /// otherwise `Idle`. Never leaves the phase stuck at `Loading`, even
    /// when the failing load had overlapped a newer one.
    fn failed(&self) {
        self.phase.set(self.resting.get());
    }
}

/// Controller for the content area (list, pagination, title, modals).
pub struct ContentController {
    store: Rc<StateStore>,
    gateway: Rc<dyn CatalogGateway>,
    scheduler: Rc<RenderScheduler>,
    target: Rc<dyn RenderTarget>,
    browse: ViewTrack,
    search: ViewTrack,
    active_kind: Cell<MediaKind>,
    last_results: Rc<RefCell<Rc<Vec<CatalogItem>>>>,
    notice_seq: Cell<u64>,
}

impl std::fmt::Debug for ContentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentController")
            .field("browse", &self.browse)
            .field("search", &self.search)
            .field("active_kind", &self.active_kind.get())
            .finish()
    }
}

impl ContentController {
    /// Wire a controller to its collaborators.
    pub fn new(
        store: Rc<StateStore>,
        gateway: Rc<dyn CatalogGateway>,
        scheduler: Rc<RenderScheduler>,
        target: Rc<dyn RenderTarget>,
    ) -> Self {
        Self {
            store,
            gateway,
            scheduler,
            target,
            browse: ViewTrack::default(),
            search: ViewTrack::default(),
            active_kind: Cell::new(MediaKind::Movies),
            last_results: Rc::new(RefCell::new(Rc::new(Vec::new()))),
            notice_seq: Cell::new(0),
        }
    }

    /// Catalog partition currently on screen.
    #[must_use]
    pub fn active_kind(&self) -> MediaKind {
        self.active_kind.get()
    }

    /// Phase of the browse view.
    #[must_use]
    pub fn browse_phase(&self) -> ViewPhase {
        self.browse.phase.get()
    }

    /// Phase of the search view.
    #[must_use]
    pub fn search_phase(&self) -> ViewPhase {
        self.search.phase.get()
    }

    /// Load one page of a browse category and paint list, pagination and
    /// title from the same response. On failure the previously displayed
    /// state stays intact (stale-but-consistent beats blank-on-error).
    pub async fn load_content(
        &self,
        category: Category,
        kind: MediaKind,
        applied: &AppliedFilters,
        sort: &str,
        page: u32,
    ) -> ClientResult<LoadOutcome> {
        let page = clamp_requested_page(page);
        // Entering browse cancels the effect of any in-flight search.
        self.search.supersede();
        let generation = self.browse.begin();

        self.active_kind.set(kind);
        self.store.update(StateUpdate::Category(category));
        self.store.update(StateUpdate::SearchQuery(None));

        let fetched = self
            .gateway
            .fetch_catalog_page(category, kind, applied, sort, page)
            .await;
        if !self.browse.is_current(generation) {
            return Err(ClientError::StateConflict {
                view: "browse",
                generation,
            });
        }
        match fetched {
            Ok(response) => {
                let total_pages = response.total_pages.max(1);
                self.store.update(StateUpdate::Pagination(Pagination {
                    current_page: page,
                    total_pages,
                }));
                *self.last_results.borrow_mut() = Rc::new(response.results);
                self.browse.displayed();
                self.schedule_content_paints();
                Ok(LoadOutcome::Displayed { total_pages })
            }
            Err(err) => {
                self.browse.failed();
                self.show_notice(NoticeKind::Error, "No se pudo cargar el contenido.");
                Err(err)
            }
        }
    }

    /// Free-text search, a separate path from category browsing. Category
    /// filters are disabled while results are shown; a confirmed empty
    /// result set paints an explicit message instead of an empty list.
    pub async fn search_by_title(&self, query: &str, page: u32) -> ClientResult<LoadOutcome> {
        let page = clamp_requested_page(page);
        // Entering search cancels the effect of any in-flight browse.
        self.browse.supersede();
        let generation = self.search.begin();

        self.store
            .update(StateUpdate::SearchQuery(Some(query.to_string())));

        let fetched = self.gateway.search_titles(query, page).await;
        if !self.search.is_current(generation) {
            return Err(ClientError::StateConflict {
                view: "search",
                generation,
            });
        }
        match fetched {
            Ok(response) if response.results.is_empty() => {
                self.store.update(StateUpdate::Pagination(Pagination {
                    current_page: 1,
                    total_pages: 1,
                }));
                *self.last_results.borrow_mut() = Rc::new(Vec::new());
                self.search.displayed();
                self.schedule_no_results(query);
                Ok(LoadOutcome::NoResults)
            }
            Ok(response) => {
                let total_pages = response.total_pages.max(1);
                self.store.update(StateUpdate::Pagination(Pagination {
                    current_page: page,
                    total_pages,
                }));
                *self.last_results.borrow_mut() = Rc::new(response.results);
                self.search.displayed();
                self.schedule_content_paints();
                Ok(LoadOutcome::Displayed { total_pages })
            }
            Err(err) => {
                self.search.failed();
                self.show_notice(NoticeKind::Error, "Error al realizar la búsqueda.");
                Err(err)
            }
        }
    }

    /// Navigate to a page in whichever view mode is active.
    pub async fn change_page(&self, page: u32) -> ClientResult<LoadOutcome> {
        let state = self.store.read();
        let bound = state.pagination.total_pages.max(1);
        let page = clamp_requested_page(page).min(bound);
        if let Some(query) = state.filters.search_query.clone() {
            self.search_by_title(&query, page).await
        } else {
            let category = state.filters.category;
            let applied = state.filters.applied.clone();
            let sort = state.filters.sort.clone();
            self.load_content(category, self.active_kind.get(), &applied, &sort, page)
                .await
        }
    }

    /// Optimistically flip favorite membership, then confirm with the
    /// server; a failed POST reverts the flip and surfaces a notice.
    pub async fn toggle_favorite(&self, id: i64, kind: MediaKind) -> ClientResult<FavoriteOutcome> {
        let was_favorite = self.store.read().favorites.contains(kind, id);
        let flipped = self.store.read().favorites.toggled(kind, id);
        self.store.update(StateUpdate::Favorites(kind, flipped));
        self.schedule_content_paints();

        match self.gateway.set_favorite(id, kind, !was_favorite).await {
            Ok(()) => Ok(FavoriteOutcome::Applied {
                now_favorite: !was_favorite,
            }),
            Err(_) => {
                // Restore the membership this toggle observed; re-toggling
                // would drift if another toggle of the same id landed while
                // the POST was in flight.
                let restored = self
                    .store
                    .read()
                    .favorites
                    .with_membership(kind, id, was_favorite);
                self.store.update(StateUpdate::Favorites(kind, restored));
                self.schedule_content_paints();
                self.show_notice(NoticeKind::Error, "No se pudo actualizar el favorito.");
                Ok(FavoriteOutcome::RolledBack)
            }
        }
    }

    /// Prime both favorite id sets from the first favorites page of each
    /// partition, as the app does at startup.
    pub async fn load_favorites(&self) -> ClientResult<()> {
        for kind in [MediaKind::Movies, MediaKind::Series] {
            let page = self
                .gateway
                .fetch_catalog_page(
                    Category::Favorites,
                    kind,
                    &AppliedFilters::default(),
                    crate::core::store::DEFAULT_SORT,
                    1,
                )
                .await?;
            let ids = page.results.iter().map(|item| item.id).collect();
            self.store.update(StateUpdate::Favorites(kind, ids));
        }
        Ok(())
    }

    /// Fetch a title's detail and watch providers and paint the detail modal.
    pub async fn show_detail(&self, id: i64, kind: MediaKind) -> ClientResult<()> {
        let detail = match self.gateway.fetch_title_detail(kind, id).await {
            Ok(detail) => detail,
            Err(err) => {
                self.show_notice(NoticeKind::Error, "No se pudo cargar el detalle.");
                return Err(err);
            }
        };
        let providers = match self.gateway.fetch_title_providers(kind, id).await {
            Ok(providers) => providers,
            Err(err) => {
                self.show_notice(NoticeKind::Error, "No se pudo cargar el detalle.");
                return Err(err);
            }
        };
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::DetailModal,
            Box::new(move || {
                target.apply(ComponentId::DetailModal, &view::detail_modal(&detail, &providers))
            }),
        );
        Ok(())
    }

    /// Download entry point: movies queue a torrent immediately, series open
    /// the season/episode picker.
    pub async fn handle_download(&self, id: i64, kind: MediaKind) -> ClientResult<()> {
        match kind {
            MediaKind::Movies => match self.gateway.request_download(id).await {
                Ok(()) => {
                    self.show_notice(NoticeKind::Info, "Descarga de película iniciada");
                    Ok(())
                }
                Err(err) => {
                    self.show_notice(NoticeKind::Error, "No se pudo iniciar la descarga.");
                    Err(err)
                }
            },
            MediaKind::Series => match self.gateway.fetch_series_detail(id).await {
                Ok(series) => {
                    let target = Rc::clone(&self.target);
                    self.scheduler.schedule(
                        ComponentId::SeriesModal,
                        Box::new(move || {
                            target.apply(ComponentId::SeriesModal, &view::series_modal(&series))
                        }),
                    );
                    Ok(())
                }
                Err(err) => {
                    self.show_notice(NoticeKind::Error, "No se pudo cargar la serie.");
                    Err(err)
                }
            },
        }
    }

    /// Queue a torrent download for one episode.
    pub async fn download_episode(&self, episode_id: i64) -> ClientResult<()> {
        match self.gateway.request_download(episode_id).await {
            Ok(()) => {
                self.show_notice(NoticeKind::Info, "Descarga del episodio iniciada");
                Ok(())
            }
            Err(err) => {
                self.show_notice(NoticeKind::Error, "No se pudo iniciar la descarga.");
                Err(err)
            }
        }
    }

    /// Queue a transient notice paint.
    pub fn show_notice(&self, kind: NoticeKind, message: &str) {
        let id = self.notice_seq.get() + 1;
        self.notice_seq.set(id);
        let notice = Notice {
            id,
            message: message.to_string(),
            kind,
        };
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::Notice,
            Box::new(move || target.apply(ComponentId::Notice, &view::notice(&notice))),
        );
    }

    /// Schedule list, pagination and title paints. The closures read the
    /// store (and the retained response items) lazily at tick time, so a
    /// paint always reflects the newest snapshot; coalescing replaces all
    /// three together when a newer response lands first.
    fn schedule_content_paints(&self) {
        let kind = self.active_kind.get();

        let store = Rc::clone(&self.store);
        let target = Rc::clone(&self.target);
        let results = Rc::clone(&self.last_results);
        self.scheduler.schedule(
            ComponentId::ContentList,
            Box::new(move || {
                let state = store.read();
                let items = Rc::clone(&results.borrow());
                let markup = if state.filters.search_query.is_some() {
                    view::search_result_cards(&items, &state.favorites)
                } else {
                    view::content_cards(&items, kind, &state.favorites)
                };
                target.apply(ComponentId::ContentList, &markup)
            }),
        );

        let store = Rc::clone(&self.store);
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::Pagination,
            Box::new(move || {
                let state = store.read();
                target.apply(
                    ComponentId::Pagination,
                    &view::pagination_controls(&state.pagination),
                )
            }),
        );

        let store = Rc::clone(&self.store);
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::PageTitle,
            Box::new(move || {
                let state = store.read();
                let title = if state.filters.search_query.is_some() {
                    search_title().to_string()
                } else {
                    page_title(state.filters.category, kind)
                };
                target.apply(ComponentId::PageTitle, &title)
            }),
        );
    }

    fn schedule_no_results(&self, query: &str) {
        let query = query.to_string();
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::ContentList,
            Box::new(move || target.apply(ComponentId::ContentList, &view::no_results(&query))),
        );
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::Pagination,
            Box::new(move || target.apply(ComponentId::Pagination, &view::empty_pagination())),
        );
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::PageTitle,
            Box::new(move || target.apply(ComponentId::PageTitle, search_title())),
        );
    }
}
