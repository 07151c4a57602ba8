//! Listener table
//!
//! Selector-keyed handler groups per (element, event name). A single logical
//! listener per pair fans out to its group at dispatch time; selectors are
//! re-evaluated on every dispatch, so descendants that appear after
//! registration still match.

use std::collections::HashMap;
use std::rc::Rc;

use vigil_dom::ElementId;

use crate::error::BoxError;
use crate::event::Event;
use crate::runtime::Runtime;

/// Handler invoked with the owning runtime and the live event.
pub type EventHandler = Rc<dyn Fn(&mut Runtime, &mut Event) -> Result<(), BoxError>>;

/// One selector-scoped listener. An empty selector targets the owning
/// element itself.
#[derive(Clone)]
pub(crate) struct DelegatedListener {
    pub selector: String,
    pub handler: EventHandler,
}

/// All listeners, keyed by owning element, then event name.
#[derive(Default)]
pub(crate) struct ListenerTable {
    groups: HashMap<ElementId, HashMap<String, Vec<DelegatedListener>>>,
}

impl ListenerTable {
    pub fn add(&mut self, owner: ElementId, event: &str, selector: &str, handler: EventHandler) {
        self.groups
            .entry(owner)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(DelegatedListener {
                selector: selector.to_string(),
                handler,
            });
    }

    /// Remove every listener registered on `owner` for `event` with
    /// `selector`.
    pub fn remove(&mut self, owner: ElementId, event: &str, selector: &str) {
        let Some(events) = self.groups.get_mut(&owner) else {
            return;
        };
        if let Some(group) = events.get_mut(event) {
            group.retain(|l| l.selector != selector);
            if group.is_empty() {
                events.remove(event);
            }
        }
        if events.is_empty() {
            self.groups.remove(&owner);
        }
    }

    /// Clone the group for a dispatch pass.
    pub fn snapshot(&self, owner: ElementId, event: &str) -> Vec<DelegatedListener> {
        self.groups
            .get(&owner)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    /// Drop the listeners of every element that is no longer alive.
    pub fn retain_live(&mut self, doc: &vigil_dom::Document) {
        self.groups.retain(|owner, _| doc.is_alive(*owner));
    }

    pub fn owner_count(&self) -> usize {
        self.groups.len()
    }
}
