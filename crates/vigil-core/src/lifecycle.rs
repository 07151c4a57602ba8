//! Lifecycle transitions
//!
//! Per-element load/show/hide state machine over the managed flags. The
//! `loading`/`show_pending`/`hide_pending` flags double as re-entrancy
//! guards: a transition already in flight turns the re-entrant call into a
//! silent no-op. Guard hits are not errors.

use tracing::{debug, trace, warn};

use vigil_dom::{ElementId, ManagedState};

use crate::error::{BoxError, LifecycleError, LifecycleResult};
use crate::event::{Event, names};
use crate::runtime::Runtime;
use crate::scheduler::Task;

/// Options for `load` and `show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Run the load callback again even when the element already loaded.
    pub reload: bool,
}

impl LoadOptions {
    pub fn reload() -> Self {
        Self { reload: true }
    }
}

impl Runtime {
    /// Queue a load for the next scheduling turn.
    pub fn trigger_load(&mut self, element: ElementId, options: LoadOptions) {
        self.queue.push(Task::Load { element, options });
    }

    /// Queue a show for the next scheduling turn.
    ///
    /// Deferral means the transition never runs synchronously inside an
    /// event handler that may still be mutating the same subtree.
    pub fn trigger_show(&mut self, element: ElementId, options: LoadOptions) {
        self.queue.push(Task::Show { element, options });
    }

    /// Run the element's load stage now.
    ///
    /// No-op while a load is in flight, and when already loaded unless
    /// `reload` is set. Emits `loading`, then on success `loaded`, on
    /// failure `loadError` carrying the callback's error.
    pub fn load(&mut self, element: ElementId, options: LoadOptions) -> LifecycleResult {
        let state = self.state_for(element, LifecycleError::Load)?;
        if state.loading {
            trace!(element = element.index(), "load already in flight");
            return Ok(());
        }
        if state.loaded && !options.reload {
            return Ok(());
        }

        self.update_state(element, |s| s.loading = true);
        let result = self.run_load(element);
        match result {
            Ok(()) => {
                self.update_state(element, |s| {
                    s.loaded = true;
                    s.loading = false;
                });
                debug!(element = element.index(), "loaded");
                self.emit(element, names::LOADED)
                    .map_err(LifecycleError::Load)
            }
            Err(e) => {
                self.update_state(element, |s| s.loading = false);
                let err = LifecycleError::Load(e);
                self.emit_error(element, names::LOAD_ERROR, &err);
                Err(err)
            }
        }
    }

    fn run_load(&mut self, element: ElementId) -> Result<(), BoxError> {
        self.emit(element, names::LOADING)?;
        if let Some(cb) = self.hook(element, |h| h.load.clone()) {
            cb(self, element)?;
        }
        Ok(())
    }

    /// Run the element's show stage now.
    ///
    /// No-op while a show is pending. Loads first (skipped when already
    /// loaded and `reload` is unset); a load failure skips the show callback
    /// entirely. Showing an already shown element re-runs the show callback.
    pub fn show(&mut self, element: ElementId, options: LoadOptions) -> LifecycleResult {
        let state = self.state_for(element, LifecycleError::Show)?;
        if state.show_pending {
            trace!(element = element.index(), "show already pending");
            return Ok(());
        }

        self.update_state(element, |s| s.show_pending = true);
        let result = self.run_show(element, options);
        match result {
            Ok(()) => {
                // show_pending clears before the notification goes out.
                self.update_state(element, |s| {
                    s.shown = true;
                    s.show_pending = false;
                });
                debug!(element = element.index(), "shown");
                self.emit(element, names::SHOWN)
                    .map_err(LifecycleError::Show)
            }
            Err(err) => {
                // Reset the guard so the element can retry.
                self.update_state(element, |s| s.show_pending = false);
                self.emit_error(element, names::SHOW_ERROR, &err);
                Err(err)
            }
        }
    }

    fn run_show(&mut self, element: ElementId, options: LoadOptions) -> LifecycleResult {
        self.emit(element, names::SHOWING)
            .map_err(LifecycleError::Show)?;
        self.load(element, options)?;
        if let Some(cb) = self.hook(element, |h| h.show.clone()) {
            cb(self, element).map_err(LifecycleError::Show)?;
        }
        Ok(())
    }

    /// Run the element's hide stage now.
    ///
    /// No-op when the element is not shown or a hide is already pending.
    /// Runs the unload callback, then the hide callback; there is no
    /// `hiding` notification. The resume subscription is dropped either way.
    pub fn hide(&mut self, element: ElementId) -> LifecycleResult {
        let state = self.state_for(element, LifecycleError::Hide)?;
        if !state.shown {
            trace!(element = element.index(), "hide on non-shown element");
            return Ok(());
        }
        if state.hide_pending {
            trace!(element = element.index(), "hide already pending");
            return Ok(());
        }

        self.resume_set.remove(&element);
        self.update_state(element, |s| s.hide_pending = true);
        let result = self.run_hide(element);
        match result {
            Ok(()) => {
                // Flags settle before `hidden` fires, so listeners observe a
                // consistent idle state.
                self.update_state(element, |s| {
                    s.shown = false;
                    s.hide_pending = false;
                });
                debug!(element = element.index(), "hidden");
                self.emit(element, names::HIDDEN)
                    .map_err(LifecycleError::Hide)
            }
            Err(err) => {
                self.update_state(element, |s| s.hide_pending = false);
                self.emit_error(element, names::HIDE_ERROR, &err);
                Err(err)
            }
        }
    }

    fn run_hide(&mut self, element: ElementId) -> LifecycleResult {
        if let Some(cb) = self.hook(element, |h| h.unload.clone()) {
            cb(self, element).map_err(LifecycleError::Hide)?;
        }
        if let Some(cb) = self.hook(element, |h| h.hide.clone()) {
            cb(self, element).map_err(LifecycleError::Hide)?;
        }
        Ok(())
    }

    /// Re-show every subscribed element on an application "resume" signal.
    ///
    /// The shows are queued, not run inline, like any other external
    /// trigger.
    pub fn fire_resume(&mut self) {
        let subscribed: Vec<ElementId> = self
            .resume_set
            .iter()
            .copied()
            .filter(|&el| self.document.is_alive(el))
            .collect();
        debug!(count = subscribed.len(), "resume signal");
        for element in subscribed {
            self.queue.push(Task::Show {
                element,
                options: LoadOptions::default(),
            });
        }
    }

    fn state_for(
        &self,
        element: ElementId,
        wrap: impl FnOnce(BoxError) -> LifecycleError,
    ) -> Result<ManagedState, LifecycleError> {
        self.document
            .element(element)
            .map(|data| data.state)
            .map_err(|e| wrap(Box::new(e)))
    }

    pub(crate) fn update_state(&mut self, element: ElementId, f: impl FnOnce(&mut ManagedState)) {
        if let Ok(data) = self.document.element_mut(element) {
            f(&mut data.state);
        }
    }

    /// Dispatch a lifecycle notification on the element.
    pub(crate) fn emit(&mut self, element: ElementId, name: &str) -> Result<(), BoxError> {
        let mut event = Event::new(name, element);
        self.dispatch_event(&mut event)
    }

    /// Dispatch a `*Error` notification. The original failure is already on
    /// its way to the caller, so a listener failing here is only logged.
    fn emit_error(&mut self, element: ElementId, name: &str, err: &LifecycleError) {
        let mut event = Event::with_error(name, element, err.callback_error().to_string());
        if let Err(listener_err) = self.dispatch_event(&mut event) {
            warn!(
                name,
                error = %listener_err,
                "error notification listener failed"
            );
        }
    }
}
