//! Applying, resetting and editing filters.
//!
//! Filters never take effect as the user types: the panel accumulates inputs
//! and only `apply_filters` snapshots them into the store and reloads. Both
//! apply and reset move pagination back to page 1, since the old page number
//! is meaningless against a different result set.

use std::rc::Rc;

use chrono::NaiveDate;

use crate::core::store::{
    AppliedFilters, FiltersState, StateStore, StateUpdate, DEFAULT_SORT,
};
use crate::error::{ClientError, ClientResult};
use crate::features::catalog::ContentController;
use crate::features::providers::subscribed_entries;
use crate::models::{LoadOutcome, NoticeKind};
use crate::services::api::CatalogGateway;

/// Raw values read from the filter form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterInputs {
    /// Lower release-date bound.
    pub start_date: Option<NaiveDate>,
    /// Upper release-date bound.
    pub end_date: Option<NaiveDate>,
}

impl FilterInputs {
    /// Parse the two date fields as `YYYY-MM-DD`, treating empty strings as
    /// unset.
    pub fn parse(start: &str, end: &str) -> ClientResult<Self> {
        let parse = |field: &str, value: &str| -> ClientResult<Option<NaiveDate>> {
            if value.is_empty() {
                return Ok(None);
            }
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| ClientError::Validation {
                    reason: format!("fecha no válida en {field}: {value}"),
                })
        };
        Ok(Self {
            start_date: parse("desde", start)?,
            end_date: parse("hasta", end)?,
        })
    }

    /// Whether either date field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Apply-button enablement: there is something to apply when a date bound or
/// an operator selection is present.
#[must_use]
pub fn inputs_active(inputs: &FilterInputs, operator_filter: &[i64]) -> bool {
    !inputs.is_empty() || !operator_filter.is_empty()
}

/// Controller for the filter panel and the operators editor.
pub struct FilterController {
    store: Rc<StateStore>,
    gateway: Rc<dyn CatalogGateway>,
    content: Rc<ContentController>,
}

impl std::fmt::Debug for FilterController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterController").finish_non_exhaustive()
    }
}

impl FilterController {
    /// Wire a controller to the store, gateway and content controller.
    pub fn new(
        store: Rc<StateStore>,
        gateway: Rc<dyn CatalogGateway>,
        content: Rc<ContentController>,
    ) -> Self {
        Self {
            store,
            gateway,
            content,
        }
    }

    /// Snapshot the panel inputs plus the current operator selection into the
    /// applied filters, reset to page 1 and reload. Rejects an inverted date
    /// range before anything is stored or fetched.
    pub async fn apply_filters(&self, inputs: FilterInputs) -> ClientResult<LoadOutcome> {
        if let (Some(start), Some(end)) = (inputs.start_date, inputs.end_date) {
            if start > end {
                let err = ClientError::Validation {
                    reason: format!("rango de fechas invertido: {start} > {end}"),
                };
                self.content
                    .show_notice(NoticeKind::Error, "La fecha inicial no puede ser posterior a la final.");
                return Err(err);
            }
        }
        let state = self.store.read();
        let applied = AppliedFilters {
            start_date: inputs.start_date,
            end_date: inputs.end_date,
            provider_ids: state.providers.operator_filter.clone(),
        };
        self.store.update(StateUpdate::AppliedFilters(applied.clone()));
        let sort = state.filters.sort.clone();
        self.content
            .load_content(
                state.filters.category,
                self.content.active_kind(),
                &applied,
                &sort,
                1,
            )
            .await
    }

    /// Return the panel to its pristine shape, keeping only the category:
    /// applied filters and the operator selection empty, sort back to the
    /// default, search mode left. Reloads page 1.
    pub async fn reset_filters(&self) -> ClientResult<LoadOutcome> {
        let category = self.store.read().filters.category;
        self.store.update(StateUpdate::Filters(FiltersState {
            category,
            sort: DEFAULT_SORT.to_string(),
            applied: AppliedFilters::default(),
            search_query: None,
        }));
        self.store.update(StateUpdate::OperatorFilter(Vec::new()));
        self.content
            .load_content(
                category,
                self.content.active_kind(),
                &AppliedFilters::default(),
                DEFAULT_SORT,
                1,
            )
            .await
    }

    /// Switch the sort key and reload from page 1 with the filters that are
    /// already applied.
    pub async fn change_sort(&self, sort: &str) -> ClientResult<LoadOutcome> {
        self.store.update(StateUpdate::Sort(sort.to_string()));
        let state = self.store.read();
        let applied = state.filters.applied.clone();
        self.content
            .load_content(
                state.filters.category,
                self.content.active_kind(),
                &applied,
                sort,
                1,
            )
            .await
    }

    /// Toggle one provider in the operator filter selection. Takes effect on
    /// the next `apply_filters`.
    pub fn toggle_operator(&self, provider_id: i64) {
        let next = self.store.read().providers.operator_toggled(provider_id);
        self.store.update(StateUpdate::OperatorFilter(next));
    }

    /// Toggle one provider in the subscribed set. Takes effect on the next
    /// `save_subscribed`.
    pub fn toggle_subscription(&self, provider_id: i64) {
        let next = self
            .store
            .read()
            .providers
            .subscription_toggled(provider_id);
        self.store.update(StateUpdate::SubscribedProviders(next));
    }

    /// Persist the subscribed operators: the subscribed ids are intersected
    /// with the known directory and the resulting entries posted as one
    /// batch.
    pub async fn save_subscribed(&self) -> ClientResult<()> {
        let entries = subscribed_entries(&self.store.read().providers);
        match self.gateway.save_subscribed_providers(&entries).await {
            Ok(()) => {
                self.content
                    .show_notice(NoticeKind::Info, "Operadoras guardadas");
                Ok(())
            }
            Err(err) => {
                self.content
                    .show_notice(NoticeKind::Error, "No se pudieron guardar las operadoras.");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::RenderScheduler;
    use crate::core::store::{Category, Pagination};
    use crate::testing::{item, page, MockGateway, RecordingTarget};
    use cartelera_api_models::{MediaKind, ProviderEntry};
    use std::collections::HashSet;

    fn harness() -> (Rc<StateStore>, Rc<MockGateway>, Rc<FilterController>) {
        let store = Rc::new(StateStore::new());
        let gateway = Rc::new(MockGateway::new());
        let scheduler = Rc::new(RenderScheduler::new());
        let target = Rc::new(RecordingTarget::new());
        let content = Rc::new(ContentController::new(
            Rc::clone(&store),
            Rc::clone(&gateway) as Rc<dyn CatalogGateway>,
            scheduler,
            target,
        ));
        let filters = Rc::new(FilterController::new(
            Rc::clone(&store),
            Rc::clone(&gateway) as Rc<dyn CatalogGateway>,
            content,
        ));
        (store, gateway, filters)
    }

    fn provider(id: i64, name: &str) -> ProviderEntry {
        ProviderEntry {
            provider_id: id,
            provider_name: name.to_string(),
            logo_path: None,
        }
    }

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn apply_filters_snapshots_inputs_and_resets_to_page_one() {
        let (store, gateway, filters) = harness();
        store.update(StateUpdate::Pagination(Pagination {
            current_page: 7,
            total_pages: 40,
        }));
        store.update(StateUpdate::OperatorFilter(vec![8, 337]));
        gateway.push_catalog(Ok(page(vec![item(1, "Dune")], 12)));

        let inputs = FilterInputs::parse("2024-01-01", "2024-12-31").unwrap();
        let _ = filters.apply_filters(inputs).await.unwrap();

        assert_eq!(gateway.catalog_pages_requested(), vec![1]);
        let state = store.read();
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.filters.applied.start_date, Some(date("2024-01-01")));
        assert_eq!(state.filters.applied.end_date, Some(date("2024-12-31")));
        assert_eq!(state.filters.applied.provider_ids, vec![8, 337]);
    }

    #[tokio::test]
    async fn inverted_date_range_is_rejected_before_any_fetch() {
        let (store, gateway, filters) = harness();
        let inputs = FilterInputs::parse("2024-12-31", "2024-01-01").unwrap();
        let err = filters.apply_filters(inputs).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(gateway.catalog_pages_requested().is_empty());
        assert!(store.read().filters.applied.is_empty());
    }

    #[test]
    fn malformed_dates_fail_to_parse() {
        let err = FilterInputs::parse("31/12/2024", "").unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        let inputs = FilterInputs::parse("", "").unwrap();
        assert_eq!(inputs, FilterInputs::default());
    }

    #[test]
    fn apply_enablement_needs_a_date_or_an_operator() {
        let empty = FilterInputs::default();
        assert!(!inputs_active(&empty, &[]));
        assert!(inputs_active(&empty, &[8]));
        let dated = FilterInputs::parse("2024-01-01", "").unwrap();
        assert!(inputs_active(&dated, &[]));
    }

    #[tokio::test]
    async fn reset_keeps_the_category_and_restores_everything_else() {
        let (store, gateway, filters) = harness();
        store.update(StateUpdate::Category(Category::Trending));
        store.update(StateUpdate::Sort("vote_average.desc".to_string()));
        store.update(StateUpdate::AppliedFilters(AppliedFilters {
            start_date: Some(date("2024-01-01")),
            end_date: None,
            provider_ids: vec![8],
        }));
        store.update(StateUpdate::OperatorFilter(vec![8]));
        gateway.push_catalog(Ok(page(vec![], 1)));

        let _ = filters.reset_filters().await.unwrap();

        assert_eq!(gateway.catalog_pages_requested(), vec![1]);
        let state = store.read();
        assert_eq!(state.filters.category, Category::Trending);
        assert_eq!(state.filters.sort, DEFAULT_SORT);
        assert!(state.filters.applied.is_empty());
        assert!(state.providers.operator_filter.is_empty());
        assert!(state.filters.search_query.is_none());
    }

    #[tokio::test]
    async fn changing_sort_reloads_from_page_one() {
        let (store, gateway, filters) = harness();
        store.update(StateUpdate::Pagination(Pagination {
            current_page: 4,
            total_pages: 9,
        }));
        gateway.push_catalog(Ok(page(vec![], 9)));

        let _ = filters.change_sort("release_date.desc").await.unwrap();

        assert_eq!(store.read().filters.sort, "release_date.desc");
        assert_eq!(gateway.catalog_pages_requested(), vec![1]);
        assert_eq!(store.read().pagination.current_page, 1);
    }

    #[test]
    fn operator_and_subscription_toggles_flip_membership() {
        let (store, _gateway, filters) = harness();
        filters.toggle_operator(8);
        filters.toggle_operator(337);
        filters.toggle_operator(8);
        assert_eq!(store.read().providers.operator_filter, vec![337]);

        filters.toggle_subscription(8);
        assert!(store.read().providers.subscribed.contains(&8));
        filters.toggle_subscription(8);
        assert!(!store.read().providers.subscribed.contains(&8));
    }

    #[tokio::test]
    async fn saving_posts_the_subscribed_entries_from_the_directory() {
        let (store, gateway, filters) = harness();
        store.update(StateUpdate::KnownProviders(
            MediaKind::Movies,
            vec![provider(8, "Netflix"), provider(337, "Disney Plus")],
        ));
        store.update(StateUpdate::KnownProviders(
            MediaKind::Series,
            vec![provider(8, "Netflix"), provider(1899, "Max")],
        ));
        store.update(StateUpdate::SubscribedProviders(HashSet::from([8, 1899])));

        filters.save_subscribed().await.unwrap();

        let saved = gateway.saved_providers();
        assert_eq!(saved.len(), 1);
        let mut names: Vec<&str> = saved[0]
            .iter()
            .map(|entry| entry.provider_name.as_str())
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Max", "Netflix"]);
    }

    #[tokio::test]
    async fn failed_save_surfaces_the_error() {
        let (_store, gateway, filters) = harness();
        gateway.push_save_result(Err(ClientError::Upstream {
            status: 500,
            endpoint: "/providers/subscribe".into(),
        }));
        let err = filters.save_subscribed().await.unwrap_err();
        assert!(matches!(err, ClientError::Upstream { status: 500, .. }));
    }
}
