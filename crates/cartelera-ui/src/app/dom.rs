//! The real render target: markup is applied to fixed mount points in the
//! page, and modal components additionally open their `<dialog>`.

use wasm_bindgen::JsCast;
use web_sys::HtmlDialogElement;

use crate::core::render::{ComponentId, RenderTarget};
use crate::error::{ClientError, ClientResult};

const fn mount_id(component: ComponentId) -> &'static str {
    match component {
        ComponentId::ContentList => "content-list",
        ComponentId::Pagination => "pagination",
        ComponentId::PageTitle => "page-title",
        ComponentId::DetailModal => "detail-modal-body",
        ComponentId::SeriesModal => "series-modal-body",
        ComponentId::ProvidersList => "providers-strip",
        ComponentId::ProvidersModal => "providers-modal-body",
        ComponentId::Notice => "notice-area",
    }
}

const fn dialog_id(component: ComponentId) -> Option<&'static str> {
    match component {
        ComponentId::DetailModal => Some("detail-modal"),
        ComponentId::SeriesModal => Some("series-modal"),
        ComponentId::ProvidersModal => Some("providers-modal"),
        _ => None,
    }
}

fn render_err(component: ComponentId, detail: &str) -> ClientError {
    ClientError::Render {
        component,
        detail: detail.to_string(),
    }
}

/// [`RenderTarget`] over `innerHTML` of the page's mount points.
#[derive(Debug, Default)]
pub(crate) struct DomTarget;

impl RenderTarget for DomTarget {
    fn apply(&self, component: ComponentId, markup: &str) -> ClientResult<()> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| render_err(component, "document unavailable"))?;
        let mount = document
            .get_element_by_id(mount_id(component))
            .ok_or_else(|| render_err(component, "mount point missing"))?;
        mount.set_inner_html(markup);
        if let Some(id) = dialog_id(component) {
            let dialog = document
                .get_element_by_id(id)
                .and_then(|element| element.dyn_into::<HtmlDialogElement>().ok())
                .ok_or_else(|| render_err(component, "dialog missing"))?;
            if !dialog.open() {
                dialog
                    .show_modal()
                    .map_err(|_| render_err(component, "dialog refused to open"))?;
            }
        }
        Ok(())
    }
}
