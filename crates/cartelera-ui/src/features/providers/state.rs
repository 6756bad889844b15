//! Provider directory bookkeeping: loading, deduplication and the
//! subscribed-set intersection.

use std::collections::HashSet;

use cartelera_api_models::{MediaKind, ProviderEntry};

use crate::core::store::{ProvidersState, StateStore, StateUpdate};
use crate::error::ClientResult;
use crate::services::api::CatalogGateway;

/// Union of the movie and series directories, deduplicated by provider id
/// (many providers appear in both) and ordered by id for stable rendering.
#[must_use]
pub fn directory_union(providers: &ProvidersState) -> Vec<ProviderEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<ProviderEntry> = providers
        .movies
        .iter()
        .chain(providers.series.iter())
        .filter(|entry| seen.insert(entry.provider_id))
        .cloned()
        .collect();
    entries.sort_by_key(|entry| entry.provider_id);
    entries
}

/// Directory entries the user is subscribed to. Ids with no directory entry
/// are dropped, so a stale subscription can never produce a nameless chip or
/// be persisted back.
#[must_use]
pub fn subscribed_entries(providers: &ProvidersState) -> Vec<ProviderEntry> {
    directory_union(providers)
        .into_iter()
        .filter(|entry| providers.subscribed.contains(&entry.provider_id))
        .collect()
}

/// Fetch both per-kind provider directories into the store.
pub async fn load_directory(
    store: &StateStore,
    gateway: &dyn CatalogGateway,
) -> ClientResult<()> {
    for kind in [MediaKind::Movies, MediaKind::Series] {
        let entries = gateway.fetch_provider_directory(kind).await?;
        store.update(StateUpdate::KnownProviders(kind, entries));
    }
    Ok(())
}

/// Fetch the persisted subscribed set into the store.
pub async fn load_subscribed(
    store: &StateStore,
    gateway: &dyn CatalogGateway,
) -> ClientResult<()> {
    let entries = gateway.fetch_subscribed_providers().await?;
    let ids = entries.iter().map(|entry| entry.provider_id).collect();
    store.update(StateUpdate::SubscribedProviders(ids));
    Ok(())
}
