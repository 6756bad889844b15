//! Markup for the operator strip and the subscription editor grid.

use crate::core::logic::poster_url;
use crate::core::store::ProvidersState;
use crate::features::catalog::view::escape;
use crate::features::providers::state::{directory_union, subscribed_entries};

/// Horizontal strip of subscribed operators. Each chip toggles that provider
/// in the operator filter; chips in the active selection are highlighted.
#[must_use]
pub fn subscribed_strip(providers: &ProvidersState) -> String {
    let mut markup = String::new();
    for entry in subscribed_entries(providers) {
        let active = if providers.operator_filter.contains(&entry.provider_id) {
            " active"
        } else {
            ""
        };
        markup.push_str(&format!(
            concat!(
                r#"<button class="provider-chip{active}" data-action="operator" "#,
                r#"data-provider-id="{id}" title="{name}">"#,
                r#"<img src="{logo}" alt="{name}"></button>"#
            ),
            active = active,
            id = entry.provider_id,
            name = escape(&entry.provider_name),
            logo = poster_url(entry.logo_path.as_deref(), "w92"),
        ));
    }
    markup
}

/// Checkbox grid over the full provider directory for editing subscriptions.
#[must_use]
pub fn provider_modal_grid(providers: &ProvidersState) -> String {
    let mut markup = String::from(r#"<div class="provider-grid">"#);
    for entry in directory_union(providers) {
        let checked = if providers.subscribed.contains(&entry.provider_id) {
            " checked"
        } else {
            ""
        };
        markup.push_str(&format!(
            concat!(
                r#"<label class="provider-option">"#,
                r#"<input type="checkbox" data-action="subscription" "#,
                r#"data-provider-id="{id}"{checked}>"#,
                r#"<img src="{logo}" alt="{name}"><span>{name}</span></label>"#
            ),
            id = entry.provider_id,
            checked = checked,
            name = escape(&entry.provider_name),
            logo = poster_url(entry.logo_path.as_deref(), "w92"),
        ));
    }
    markup.push_str("</div>");
    markup
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartelera_api_models::ProviderEntry;
    use std::collections::HashSet;

    fn provider(id: i64, name: &str) -> ProviderEntry {
        ProviderEntry {
            provider_id: id,
            provider_name: name.to_string(),
            logo_path: Some(format!("/logo{id}.jpg")),
        }
    }

    #[test]
    fn strip_shows_only_subscribed_and_marks_the_operator_selection() {
        let providers = ProvidersState {
            movies: vec![provider(8, "Netflix"), provider(337, "Disney Plus")],
            series: Vec::new(),
            subscribed: HashSet::from([8, 337]),
            operator_filter: vec![8],
        };
        let markup = subscribed_strip(&providers);
        assert!(markup.contains(r#"data-provider-id="8""#));
        assert!(markup.contains("provider-chip active"));
        assert_eq!(markup.matches("provider-chip").count(), 2);
        assert_eq!(markup.matches(" active").count(), 1);
    }

    #[test]
    fn grid_covers_the_whole_directory_and_checks_subscriptions() {
        let providers = ProvidersState {
            movies: vec![provider(8, "Netflix")],
            series: vec![provider(1899, "Max")],
            subscribed: HashSet::from([1899]),
            operator_filter: Vec::new(),
        };
        let markup = provider_modal_grid(&providers);
        assert!(markup.contains("Netflix"));
        assert!(markup.contains("Max"));
        assert_eq!(markup.matches("checked").count(), 1);
        assert!(markup.contains(r#"data-provider-id="1899" checked"#));
    }
}
