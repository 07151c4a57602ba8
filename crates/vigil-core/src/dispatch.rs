//! Delegated dispatch
//!
//! One logical listener per (element, event name) fans out to selector
//! matched handlers. Handlers run sequentially, innermost match first, with
//! the group's own element last; a stopped event halts both the remaining
//! handlers and the outward walk.

use tracing::trace;

use vigil_dom::{ElementId, Selector};

use crate::error::BoxError;
use crate::event::Event;
use crate::listeners::EventHandler;
use crate::runtime::Runtime;

impl Runtime {
    /// Register a delegated handler on `owner` for `event`.
    ///
    /// The selector is matched against the dispatch origin's ancestry inside
    /// `owner` on every dispatch; an empty selector targets `owner` itself.
    pub fn add_listener(
        &mut self,
        owner: ElementId,
        event: &str,
        selector: &str,
        handler: impl Fn(&mut Runtime, &mut Event) -> Result<(), BoxError> + 'static,
    ) {
        self.listeners
            .add(owner, event, selector, std::rc::Rc::new(handler));
    }

    /// Remove the handlers registered on `owner` for `event` under
    /// `selector`.
    pub fn remove_listener(&mut self, owner: ElementId, event: &str, selector: &str) {
        self.listeners.remove(owner, event, selector);
    }

    /// Dispatch an event named `name` originating at `origin`.
    ///
    /// A handler failure aborts the dispatch and propagates; handlers queued
    /// after the failing one do not run.
    pub fn dispatch(&mut self, origin: ElementId, name: &str) -> Result<(), BoxError> {
        let mut event = Event::new(name, origin);
        self.dispatch_event(&mut event)
    }

    pub(crate) fn dispatch_event(&mut self, event: &mut Event) -> Result<(), BoxError> {
        let origin = event.target();
        let chain = if event.bubbles() {
            self.document.self_and_ancestors(origin)
        } else if self.document.is_alive(origin) {
            vec![origin]
        } else {
            Vec::new()
        };

        for owner in chain {
            self.run_group(owner, event)?;
            if event.propagation_stopped() {
                trace!(name = event.name(), "propagation stopped");
                break;
            }
        }
        Ok(())
    }

    /// Run the listener group `owner` holds for this event.
    fn run_group(&mut self, owner: ElementId, event: &mut Event) -> Result<(), BoxError> {
        let listeners = self.listeners.snapshot(owner, event.name());
        if listeners.is_empty() {
            return Ok(());
        }

        let origin = event.target();
        let mut matched: Vec<(u32, ElementId, EventHandler)> = Vec::new();
        let mut own: Vec<EventHandler> = Vec::new();

        for listener in listeners {
            if listener.selector.is_empty() {
                own.push(listener.handler);
                continue;
            }
            let Some(selector) = Selector::parse(&listener.selector) else {
                continue;
            };
            let Some(node) = self.document.closest_within(origin, &selector, owner) else {
                continue;
            };
            let Some(distance) = self.document.distance(origin, node) else {
                continue;
            };
            matched.push((distance, node, listener.handler));
        }

        // Innermost match first; ties keep registration order.
        matched.sort_by_key(|(distance, _, _)| *distance);

        let ordered = matched
            .into_iter()
            .map(|(_, node, handler)| (node, handler))
            .chain(own.into_iter().map(|handler| (owner, handler)));

        event.set_current_target(owner);
        for (node, handler) in ordered {
            if event.propagation_stopped() {
                break;
            }
            event.set_delegator_target(node);
            handler(self, event)?;
        }
        Ok(())
    }
}
