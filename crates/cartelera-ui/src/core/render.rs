//! Render scheduling with per-component coalescing.
//!
//! # Design
//! - At most one pending paint per [`ComponentId`]; re-scheduling a pending
//!   component replaces the stored closure, so one tick executes exactly the
//!   last-scheduled paint for each component.
//! - Paints read the state store lazily when they run, not when they are
//!   scheduled, so they always observe the latest snapshot.
//! - A failing paint is reported and skipped; it never suppresses the other
//!   components' paints in the same tick.
//!
//! The first schedule of a batch fires the frame hook once; on wasm the app
//! shell installs a hook that arms `requestAnimationFrame` and calls
//! [`RenderScheduler::tick`] from the callback. Tests skip the hook and call
//! `tick` directly.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::ClientError;

/// Logical view a paint belongs to. One pending paint is kept per id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComponentId {
    /// The card grid or search-result list.
    ContentList,
    /// The pagination control strip.
    Pagination,
    /// The page heading.
    PageTitle,
    /// The title detail modal.
    DetailModal,
    /// The season/episode download picker.
    SeriesModal,
    /// The subscribed-providers strip next to the filters.
    ProvidersList,
    /// The provider subscription modal grid.
    ProvidersModal,
    /// The transient notice area.
    Notice,
}

/// A deferred paint. Runs once on the next tick.
pub type PaintFn = Box<dyn FnOnce() -> Result<(), ClientError>>;

/// Hook fired when an idle scheduler receives its first paint of a batch.
pub type FrameHook = Box<dyn Fn()>;

/// Boundary to the DOM layer: applies declarative markup for one component.
/// The wasm shell writes `innerHTML`; tests record the markup.
pub trait RenderTarget {
    /// Replace the rendered content of `component` with `markup`.
    ///
    /// # Errors
    /// Returns [`ClientError::Render`] when the target cannot host the
    /// component (e.g. its element is missing from the document).
    fn apply(&self, component: ComponentId, markup: &str) -> Result<(), ClientError>;
}

/// Coalescing scheduler for paint closures.
#[derive(Default)]
pub struct RenderScheduler {
    pending: RefCell<BTreeMap<ComponentId, PaintFn>>,
    frame_armed: Cell<bool>,
    frame_hook: RefCell<Option<FrameHook>>,
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("pending", &self.pending.borrow().len())
            .field("frame_armed", &self.frame_armed.get())
            .finish()
    }
}

impl RenderScheduler {
    /// Create an idle scheduler with no frame hook installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the hook fired once per batch when the first paint arrives.
    pub fn set_frame_hook(&self, hook: FrameHook) {
        *self.frame_hook.borrow_mut() = Some(hook);
    }

    /// Queue `paint` for `component`, replacing any paint already pending for
    /// it. Fires the frame hook when this is the first paint of a batch.
    pub fn schedule(&self, component: ComponentId, paint: PaintFn) {
        self.pending.borrow_mut().insert(component, paint);
        if !self.frame_armed.replace(true) {
            if let Some(hook) = self.frame_hook.borrow().as_ref() {
                hook();
            }
        }
    }

    /// Whether a paint is pending for `component`.
    #[must_use]
    pub fn is_pending(&self, component: ComponentId) -> bool {
        self.pending.borrow().contains_key(&component)
    }

    /// Number of pending paints.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run every pending paint once, in component order, and return the
    /// failures. Components become eligible for scheduling again before the
    /// paints run, so a paint may schedule follow-up work into the next tick.
    pub fn tick(&self) -> Vec<(ComponentId, ClientError)> {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        self.frame_armed.set(false);
        let mut failures = Vec::new();
        for (component, paint) in batch {
            if let Err(err) = paint() {
                failures.push((component, err));
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_paint(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> PaintFn {
        let log = Rc::clone(log);
        Box::new(move || {
            log.borrow_mut().push(tag);
            Ok(())
        })
    }

    #[test]
    fn coalescing_runs_only_the_last_scheduled_paint() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        scheduler.schedule(ComponentId::ContentList, recording_paint(&log, "first"));
        scheduler.schedule(ComponentId::ContentList, recording_paint(&log, "second"));
        assert_eq!(scheduler.pending_count(), 1);

        let failures = scheduler.tick();
        assert!(failures.is_empty());
        assert_eq!(*log.borrow(), vec!["second"]);
    }

    #[test]
    fn frame_hook_fires_once_per_batch() {
        let scheduler = RenderScheduler::new();
        let frames = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&frames);
        scheduler.set_frame_hook(Box::new(move || counter.set(counter.get() + 1)));

        scheduler.schedule(ComponentId::ContentList, Box::new(|| Ok(())));
        scheduler.schedule(ComponentId::Pagination, Box::new(|| Ok(())));
        scheduler.schedule(ComponentId::ContentList, Box::new(|| Ok(())));
        assert_eq!(frames.get(), 1);

        let _ = scheduler.tick();
        scheduler.schedule(ComponentId::ContentList, Box::new(|| Ok(())));
        assert_eq!(frames.get(), 2);
    }

    #[test]
    fn component_is_eligible_again_after_tick() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        scheduler.schedule(ComponentId::Pagination, recording_paint(&log, "one"));
        assert!(scheduler.tick().is_empty());
        scheduler.schedule(ComponentId::Pagination, recording_paint(&log, "two"));
        assert!(scheduler.tick().is_empty());
        assert_eq!(*log.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn a_failing_paint_does_not_suppress_others() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        scheduler.schedule(
            ComponentId::ContentList,
            Box::new(|| {
                Err(ClientError::Render {
                    component: ComponentId::ContentList,
                    detail: "missing element".into(),
                })
            }),
        );
        scheduler.schedule(ComponentId::Pagination, recording_paint(&log, "pages"));

        let failures = scheduler.tick();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, ComponentId::ContentList);
        assert_eq!(*log.borrow(), vec!["pages"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn paints_scheduled_during_tick_land_in_the_next_batch() {
        let scheduler = Rc::new(RenderScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::clone(&scheduler);
        let inner_log = Rc::clone(&log);
        scheduler.schedule(
            ComponentId::ContentList,
            Box::new(move || {
                inner_log.borrow_mut().push("outer");
                inner.schedule(ComponentId::ContentList, recording_paint(&inner_log, "inner"));
                Ok(())
            }),
        );

        assert!(scheduler.tick().is_empty());
        assert_eq!(*log.borrow(), vec!["outer"]);
        assert!(scheduler.is_pending(ComponentId::ContentList));
        assert!(scheduler.tick().is_empty());
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }
}
