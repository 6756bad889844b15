//! Browser entry point: wires store, scheduler, gateway and controllers
//! together, drives the scheduler from `requestAnimationFrame`, and turns
//! delegated DOM events into controller calls. Nothing below this module
//! touches `web-sys`.

mod config;
mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use cartelera_api_models::MediaKind;
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlSelectElement};

use crate::core::render::{ComponentId, RenderScheduler, RenderTarget};
use crate::core::store::{Category, StateStore};
use crate::error::{ClientError, ClientResult};
use crate::features::catalog::ContentController;
use crate::features::filters::{FilterController, FilterInputs};
use crate::features::providers;
use crate::models::{LoadOutcome, NoticeKind};
use crate::services::api::{CatalogGateway, HttpCatalogGateway};

struct App {
    store: Rc<StateStore>,
    scheduler: Rc<RenderScheduler>,
    gateway: Rc<dyn CatalogGateway>,
    target: Rc<dyn RenderTarget>,
    content: Rc<ContentController>,
    filters: Rc<FilterController>,
}

/// Boot the client: install the frame driver and event listeners, then run
/// the startup loads (favorites, provider directory, subscriptions, first
/// content page).
pub fn run_app() {
    console_error_panic_hook::set_once();

    let store = Rc::new(StateStore::new());
    let scheduler = Rc::new(RenderScheduler::new());
    install_frame_driver(&scheduler);

    let gateway: Rc<dyn CatalogGateway> = Rc::new(HttpCatalogGateway::new(config::api_base_url()));
    let target: Rc<dyn RenderTarget> = Rc::new(dom::DomTarget);
    let content = Rc::new(ContentController::new(
        Rc::clone(&store),
        Rc::clone(&gateway),
        Rc::clone(&scheduler),
        Rc::clone(&target),
    ));
    let filters = Rc::new(FilterController::new(
        Rc::clone(&store),
        Rc::clone(&gateway),
        Rc::clone(&content),
    ));
    let app = Rc::new(App {
        store,
        scheduler,
        gateway,
        target,
        content,
        filters,
    });

    install_listeners(&app);
    bootstrap(Rc::clone(&app));
}

/// Arm one `requestAnimationFrame` per scheduler batch. The frame handle is
/// held until it fires; the scheduler only re-invokes the hook after the
/// batch it armed has been ticked.
fn install_frame_driver(scheduler: &Rc<RenderScheduler>) {
    let holder: Rc<RefCell<Option<AnimationFrame>>> = Rc::new(RefCell::new(None));
    let weak = Rc::downgrade(scheduler);
    scheduler.set_frame_hook(Box::new(move || {
        let weak = weak.clone();
        let done = Rc::clone(&holder);
        let frame = request_animation_frame(move |_timestamp| {
            done.borrow_mut().take();
            if let Some(scheduler) = weak.upgrade() {
                for (component, err) in scheduler.tick() {
                    gloo::console::error!(format!("paint of {component:?} failed: {err}"));
                }
            }
        });
        holder.borrow_mut().replace(frame);
    }));
}

/// Startup loads run as two independent tasks: the content path needs the
/// favorite sets before the first paint, the provider strip needs the
/// directory and the subscribed set; neither path needs the other.
fn bootstrap(app: Rc<App>) {
    let shell = Rc::clone(&app);
    spawn_local(async move {
        if let Err(err) = shell.content.load_favorites().await {
            gloo::console::warn!(format!("favorites priming failed: {err}"));
        }
        let state = shell.store.read();
        let applied = state.filters.applied.clone();
        let sort = state.filters.sort.clone();
        report(
            "initial load",
            shell
                .content
                .load_content(Category::Popular, MediaKind::Movies, &applied, &sort, 1)
                .await,
        );
    });

    spawn_local(async move {
        if let Err(err) = providers::load_directory(&app.store, &*app.gateway).await {
            gloo::console::warn!(format!("provider directory load failed: {err}"));
        }
        if let Err(err) = providers::load_subscribed(&app.store, &*app.gateway).await {
            gloo::console::warn!(format!("subscribed providers load failed: {err}"));
        }
        app.schedule_providers_strip();
    });
}

fn install_listeners(app: &Rc<App>) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        gloo::console::error!("document unavailable, no listeners installed");
        return;
    };

    let clicks = Rc::clone(app);
    EventListener::new(&document, "click", move |event| {
        clicks.on_click(event);
    })
    .forget();

    let changes = Rc::clone(app);
    EventListener::new(&document, "change", move |event| {
        changes.on_change(event);
    })
    .forget();
}

/// Stale-response discards are expected under fast navigation; they are
/// logged, never surfaced. Anything else is a real failure.
fn report(context: &str, result: ClientResult<LoadOutcome>) {
    match result {
        Ok(_) => {}
        Err(err @ ClientError::StateConflict { .. }) => {
            gloo::console::log!(format!("{context}: {err}"));
        }
        Err(err) => gloo::console::error!(format!("{context} failed: {err}")),
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn attr_i64(element: &Element, name: &str) -> Option<i64> {
    element.get_attribute(name)?.parse().ok()
}

fn kind_attr(element: &Element) -> MediaKind {
    match element.get_attribute("data-kind").as_deref() {
        Some("tv") => MediaKind::Series,
        _ => MediaKind::Movies,
    }
}

fn input_value(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

impl App {
    fn on_click(self: &Rc<Self>, event: &Event) {
        let Some(element) = event_element(event) else {
            return;
        };

        // Pagination buttons carry only their target page.
        if let Ok(Some(button)) = element.closest("[data-page]") {
            if button.closest(".disabled").ok().flatten().is_some() {
                return;
            }
            if let Some(page) = button
                .get_attribute("data-page")
                .and_then(|value| value.parse::<u32>().ok())
            {
                let app = Rc::clone(self);
                spawn_local(async move {
                    report("page change", app.content.change_page(page).await);
                });
            }
            return;
        }

        // Episode download buttons inside the series modal.
        if let Ok(Some(button)) = element.closest("[data-episode-id]") {
            if let Some(episode_id) = attr_i64(&button, "data-episode-id") {
                let app = Rc::clone(self);
                spawn_local(async move {
                    if let Err(err) = app.content.download_episode(episode_id).await {
                        gloo::console::error!(format!("episode download failed: {err}"));
                    }
                });
            }
            return;
        }

        let Ok(Some(actionable)) = element.closest("[data-action]") else {
            return;
        };
        let action = actionable.get_attribute("data-action").unwrap_or_default();
        match action.as_str() {
            "detail" | "favorite" | "download" => self.on_card_action(&action, &actionable),
            "category" => self.on_category(&actionable),
            "search" => self.on_search(),
            "apply-filters" => self.on_apply_filters(),
            "reset-filters" => {
                let app = Rc::clone(self);
                spawn_local(async move {
                    report("filter reset", app.filters.reset_filters().await);
                });
            }
            "operator" => {
                if let Some(id) = attr_i64(&actionable, "data-provider-id") {
                    self.filters.toggle_operator(id);
                    self.schedule_providers_strip();
                }
            }
            "open-providers" => self.schedule_providers_modal(),
            "save-providers" => {
                let app = Rc::clone(self);
                spawn_local(async move {
                    if app.filters.save_subscribed().await.is_ok() {
                        app.schedule_providers_strip();
                    }
                });
            }
            _ => {}
        }
    }

    fn on_change(self: &Rc<Self>, event: &Event) {
        let Some(element) = event_element(event) else {
            return;
        };
        let Ok(Some(actionable)) = element.closest("[data-action]") else {
            return;
        };
        match actionable.get_attribute("data-action").as_deref() {
            Some("sort") => {
                if let Some(select) = actionable.dyn_ref::<HtmlSelectElement>() {
                    let sort = select.value();
                    let app = Rc::clone(self);
                    spawn_local(async move {
                        report("sort change", app.filters.change_sort(&sort).await);
                    });
                }
            }
            Some("subscription") => {
                if let Some(id) = attr_i64(&actionable, "data-provider-id") {
                    self.filters.toggle_subscription(id);
                }
            }
            _ => {}
        }
    }

    /// Card buttons resolve their subject from the enclosing element carrying
    /// `data-id`/`data-kind`.
    fn on_card_action(self: &Rc<Self>, action: &str, actionable: &Element) {
        let Ok(Some(card)) = actionable.closest("[data-id]") else {
            return;
        };
        let Some(id) = attr_i64(&card, "data-id") else {
            return;
        };
        let kind = kind_attr(&card);
        let action = action.to_string();
        let app = Rc::clone(self);
        spawn_local(async move {
            let result = match action.as_str() {
                "detail" => app.content.show_detail(id, kind).await,
                "download" => app.content.handle_download(id, kind).await,
                _ => app.content.toggle_favorite(id, kind).await.map(|_| ()),
            };
            if let Err(err) = result {
                gloo::console::error!(format!("{action} failed for {id}: {err}"));
            }
        });
    }

    fn on_category(self: &Rc<Self>, actionable: &Element) {
        let category = match actionable.get_attribute("data-category").as_deref() {
            Some("trending") => Category::Trending,
            Some("favorites") => Category::Favorites,
            _ => Category::Popular,
        };
        let kind = kind_attr(actionable);
        let app = Rc::clone(self);
        spawn_local(async move {
            let state = app.store.read();
            let applied = state.filters.applied.clone();
            let sort = state.filters.sort.clone();
            report(
                "category load",
                app.content
                    .load_content(category, kind, &applied, &sort, 1)
                    .await,
            );
        });
    }

    fn on_search(self: &Rc<Self>) {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let query = input_value(&document, "search-input");
        let query = query.trim().to_string();
        if query.is_empty() {
            return;
        }
        let app = Rc::clone(self);
        spawn_local(async move {
            report("search", app.content.search_by_title(&query, 1).await);
        });
    }

    fn on_apply_filters(self: &Rc<Self>) {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let start = input_value(&document, "filter-start-date");
        let end = input_value(&document, "filter-end-date");
        let inputs = match FilterInputs::parse(&start, &end) {
            Ok(inputs) => inputs,
            Err(err) => {
                self.content
                    .show_notice(NoticeKind::Error, "Fechas de filtro no válidas.");
                gloo::console::warn!(format!("filter input rejected: {err}"));
                return;
            }
        };
        let app = Rc::clone(self);
        spawn_local(async move {
            report("filter apply", app.filters.apply_filters(inputs).await);
        });
    }

    fn schedule_providers_strip(&self) {
        let store = Rc::clone(&self.store);
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::ProvidersList,
            Box::new(move || {
                let state = store.read();
                target.apply(
                    ComponentId::ProvidersList,
                    &providers::view::subscribed_strip(&state.providers),
                )
            }),
        );
    }

    fn schedule_providers_modal(&self) {
        let store = Rc::clone(&self.store);
        let target = Rc::clone(&self.target);
        self.scheduler.schedule(
            ComponentId::ProvidersModal,
            Box::new(move || {
                let state = store.read();
                target.apply(
                    ComponentId::ProvidersModal,
                    &providers::view::provider_modal_grid(&state.providers),
                )
            }),
        );
    }
}
