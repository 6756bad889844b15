//! App-wide state store.
//!
//! # Design
//! - One [`AppState`] aggregate is the single source of truth for UI state.
//! - Every slice sits behind an `Rc`, so [`StateStore::update`] produces a new
//!   top-level snapshot that structurally shares all untouched branches with
//!   the previous one. Readers holding an old snapshot never see it mutate.
//! - Updates are path-addressed through [`StateUpdate`]: each variant carries
//!   both the dotted address and the typed payload, so a mismatched
//!   path/value pair cannot be expressed.
//! - The store is only ever driven from the single UI execution context, so
//!   interior mutability with `RefCell` is enough; there are no locks.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use cartelera_api_models::{MediaKind, ProviderEntry};
use chrono::NaiveDate;

use crate::core::logic::MAX_PAGE;

/// Default sort key applied before the user picks one.
pub const DEFAULT_SORT: &str = "popularity.desc";

/// Browse mode, distinct from free-text search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Category {
    /// Popular titles via `/discover`.
    #[default]
    Popular,
    /// Trending titles via `/trending`.
    Trending,
    /// The user's favorites via `/favorites`.
    Favorites,
}

/// Favorite title ids, one set per catalog partition.
///
/// Membership tests are O(1) and an id only ever lives in the set of its own
/// media kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavoritesState {
    /// Favorite movie ids.
    pub movies: HashSet<i64>,
    /// Favorite series ids.
    pub series: HashSet<i64>,
}

impl FavoritesState {
    /// Set for the given kind.
    #[must_use]
    pub const fn set(&self, kind: MediaKind) -> &HashSet<i64> {
        match kind {
            MediaKind::Movies => &self.movies,
            MediaKind::Series => &self.series,
        }
    }

    /// Whether `id` is a favorite of the given kind.
    #[must_use]
    pub fn contains(&self, kind: MediaKind, id: i64) -> bool {
        self.set(kind).contains(&id)
    }

    /// Whether `id` is a favorite of either kind (used by mixed search results).
    #[must_use]
    pub fn contains_any(&self, id: i64) -> bool {
        self.movies.contains(&id) || self.series.contains(&id)
    }

    /// The set for `kind` with `id`'s membership flipped.
    #[must_use]
    pub fn toggled(&self, kind: MediaKind, id: i64) -> HashSet<i64> {
        let mut next = self.set(kind).clone();
        if !next.remove(&id) {
            next.insert(id);
        }
        next
    }

    /// The set for `kind` with `id`'s membership forced to `present`. Lets a
    /// failed optimistic toggle restore the membership it observed even when
    /// another toggle of the same id landed in between.
    #[must_use]
    pub fn with_membership(&self, kind: MediaKind, id: i64, present: bool) -> HashSet<i64> {
        let mut next = self.set(kind).clone();
        if present {
            next.insert(id);
        } else {
            next.remove(&id);
        }
        next
    }
}

/// Watch-provider directory, subscription set and operator filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProvidersState {
    /// Known providers for the movie catalog, in upstream order.
    pub movies: Vec<ProviderEntry>,
    /// Known providers for the series catalog, in upstream order.
    pub series: Vec<ProviderEntry>,
    /// Ids the user is subscribed to.
    pub subscribed: HashSet<i64>,
    /// Provider ids currently selected for content filtering, in click order.
    pub operator_filter: Vec<i64>,
}

impl ProvidersState {
    /// Known provider list for the given kind.
    #[must_use]
    pub const fn known(&self, kind: MediaKind) -> &Vec<ProviderEntry> {
        match kind {
            MediaKind::Movies => &self.movies,
            MediaKind::Series => &self.series,
        }
    }

    /// `operator_filter` with `id` toggled, preserving click order.
    #[must_use]
    pub fn operator_toggled(&self, id: i64) -> Vec<i64> {
        let mut next = self.operator_filter.clone();
        if let Some(pos) = next.iter().position(|other| *other == id) {
            next.remove(pos);
        } else {
            next.push(id);
        }
        next
    }

    /// `subscribed` with `id`'s membership flipped.
    #[must_use]
    pub fn subscription_toggled(&self, id: i64) -> HashSet<i64> {
        let mut next = self.subscribed.clone();
        if !next.remove(&id) {
            next.insert(id);
        }
        next
    }
}

/// Current page and page count for the visible list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based current page, never above `total_pages` or [`MAX_PAGE`].
    pub current_page: u32,
    /// Total pages reported by the last response, at least 1.
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl Pagination {
    /// Build a pagination slice with the invariants applied: pages are
    /// 1-based, `current_page <= max(total_pages, 1)` and never above the
    /// upstream hard cap.
    #[must_use]
    pub fn clamped(requested_page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        let bound = total_pages.min(MAX_PAGE);
        Self {
            current_page: requested_page.clamp(1, bound),
            total_pages,
        }
    }
}

/// Date-range and provider filters applied to a discover request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedFilters {
    /// Lower bound for the release date.
    pub start_date: Option<NaiveDate>,
    /// Upper bound for the release date.
    pub end_date: Option<NaiveDate>,
    /// Provider ids restricting results to specific services.
    pub provider_ids: Vec<i64>,
}

impl AppliedFilters {
    /// Whether any filter input is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.provider_ids.is_empty()
    }
}

/// Filter, sort and view-mode state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiltersState {
    /// Active browse category.
    pub category: Category,
    /// Active sort key (e.g. `popularity.desc`).
    pub sort: String,
    /// Filters currently applied to content requests.
    pub applied: AppliedFilters,
    /// Active search query. `Some` means the client is in search mode and
    /// category filters are disabled for the duration.
    pub search_query: Option<String>,
}

impl Default for FiltersState {
    fn default() -> Self {
        Self {
            category: Category::default(),
            sort: DEFAULT_SORT.to_string(),
            applied: AppliedFilters::default(),
            search_query: None,
        }
    }
}

/// The single state aggregate. Slices are `Rc`-shared between snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Favorite ids per catalog partition.
    pub favorites: Rc<FavoritesState>,
    /// Provider directory, subscriptions and operator filter.
    pub providers: Rc<ProvidersState>,
    /// Pagination for the visible list.
    pub pagination: Rc<Pagination>,
    /// Filter/sort/search state.
    pub filters: Rc<FiltersState>,
}

/// A path-addressed state mutation. Each variant carries its dotted address
/// (reported by [`StateUpdate::path`]) together with the only payload type
/// that address accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum StateUpdate {
    /// Replace the favorite set of one kind.
    Favorites(MediaKind, HashSet<i64>),
    /// Replace the known provider directory of one kind.
    KnownProviders(MediaKind, Vec<ProviderEntry>),
    /// Replace the subscribed provider ids.
    SubscribedProviders(HashSet<i64>),
    /// Replace the operator filter selection.
    OperatorFilter(Vec<i64>),
    /// Replace the whole pagination slice (invariants re-applied).
    Pagination(Pagination),
    /// Move to a page within the current page count.
    CurrentPage(u32),
    /// Replace the whole filter slice.
    Filters(FiltersState),
    /// Replace the applied filters, keeping category/sort/search.
    AppliedFilters(AppliedFilters),
    /// Replace the sort key.
    Sort(String),
    /// Replace the browse category.
    Category(Category),
    /// Enter (`Some`) or leave (`None`) search mode.
    SearchQuery(Option<String>),
}

impl StateUpdate {
    /// Dotted address of the branch this update replaces.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Favorites(MediaKind::Movies, _) => "favorites.movies",
            Self::Favorites(MediaKind::Series, _) => "favorites.series",
            Self::KnownProviders(MediaKind::Movies, _) => "providers.movies",
            Self::KnownProviders(MediaKind::Series, _) => "providers.series",
            Self::SubscribedProviders(_) => "providers.subscribed",
            Self::OperatorFilter(_) => "providers.operatorFilter",
            Self::Pagination(_) => "pagination",
            Self::CurrentPage(_) => "pagination.currentPage",
            Self::Filters(_) => "filters",
            Self::AppliedFilters(_) => "filters.applied",
            Self::Sort(_) => "filters.sort",
            Self::Category(_) => "filters.category",
            Self::SearchQuery(_) => "filters.searchQuery",
        }
    }
}

/// Owner of the [`AppState`] snapshots.
#[derive(Debug, Default)]
pub struct StateStore {
    current: RefCell<Rc<AppState>>,
}

impl StateStore {
    /// Create a store with default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Cheap to clone and safe to hold across await
    /// points; later updates produce new snapshots instead of mutating it.
    #[must_use]
    pub fn read(&self) -> Rc<AppState> {
        Rc::clone(&self.current.borrow())
    }

    /// Apply one path-addressed update, replacing the addressed branch and
    /// structurally sharing every other slice with the previous snapshot.
    pub fn update(&self, update: StateUpdate) {
        let prev = self.read();
        let mut next = AppState {
            favorites: Rc::clone(&prev.favorites),
            providers: Rc::clone(&prev.providers),
            pagination: Rc::clone(&prev.pagination),
            filters: Rc::clone(&prev.filters),
        };
        match update {
            StateUpdate::Favorites(kind, ids) => {
                let mut favorites = (*prev.favorites).clone();
                match kind {
                    MediaKind::Movies => favorites.movies = ids,
                    MediaKind::Series => favorites.series = ids,
                }
                next.favorites = Rc::new(favorites);
            }
            StateUpdate::KnownProviders(kind, entries) => {
                let mut providers = (*prev.providers).clone();
                match kind {
                    MediaKind::Movies => providers.movies = entries,
                    MediaKind::Series => providers.series = entries,
                }
                next.providers = Rc::new(providers);
            }
            StateUpdate::SubscribedProviders(ids) => {
                let mut providers = (*prev.providers).clone();
                providers.subscribed = ids;
                next.providers = Rc::new(providers);
            }
            StateUpdate::OperatorFilter(ids) => {
                let mut providers = (*prev.providers).clone();
                providers.operator_filter = ids;
                next.providers = Rc::new(providers);
            }
            StateUpdate::Pagination(pagination) => {
                next.pagination = Rc::new(Pagination::clamped(
                    pagination.current_page,
                    pagination.total_pages,
                ));
            }
            StateUpdate::CurrentPage(page) => {
                next.pagination = Rc::new(Pagination::clamped(page, prev.pagination.total_pages));
            }
            StateUpdate::Filters(filters) => {
                next.filters = Rc::new(filters);
            }
            StateUpdate::AppliedFilters(applied) => {
                let mut filters = (*prev.filters).clone();
                filters.applied = applied;
                next.filters = Rc::new(filters);
            }
            StateUpdate::Sort(sort) => {
                let mut filters = (*prev.filters).clone();
                filters.sort = sort;
                next.filters = Rc::new(filters);
            }
            StateUpdate::Category(category) => {
                let mut filters = (*prev.filters).clone();
                filters.category = category;
                next.filters = Rc::new(filters);
            }
            StateUpdate::SearchQuery(query) => {
                let mut filters = (*prev.filters).clone();
                filters.search_query = query;
                next.filters = Rc::new(filters);
            }
        }
        *self.current.borrow_mut() = Rc::new(next);
    }
}
