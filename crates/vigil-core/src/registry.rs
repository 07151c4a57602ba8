//! Element registry
//!
//! Liveness-tracked entries binding managed elements to their attach and
//! detach triggers. The registry holds ids only, so it never keeps a freed
//! element's slot occupied; dead entries are pruned lazily on the next
//! batch.

use std::rc::Rc;

use tracing::trace;

use vigil_dom::{Document, ElementId};

use crate::error::LifecycleResult;
use crate::runtime::Runtime;

/// Trigger invoked by the attachment observer.
pub(crate) type TriggerFn = Rc<dyn Fn(&mut Runtime) -> LifecycleResult>;

/// One managed element with its attach/detach triggers.
#[derive(Clone)]
pub(crate) struct RegistryEntry {
    pub element: ElementId,
    pub show: TriggerFn,
    pub hide: TriggerFn,
}

/// Registry of managed elements. There is no explicit deregistration;
/// entries leave when their element stops being alive.
#[derive(Default)]
pub(crate) struct ElementRegistry {
    entries: Vec<RegistryEntry>,
}

impl ElementRegistry {
    /// Add an entry, replacing any previous entry for the same element so
    /// repeated setup cannot double-trigger.
    pub fn register(&mut self, entry: RegistryEntry) {
        self.entries.retain(|e| e.element != entry.element);
        self.entries.push(entry);
    }

    /// Drop entries whose element is gone, returning clones of the
    /// survivors for invocation.
    pub fn purge_and_collect(&mut self, doc: &Document) -> Vec<RegistryEntry> {
        let before = self.entries.len();
        self.entries.retain(|e| doc.is_alive(e.element));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            trace!(dropped, "purged dead registry entries");
        }
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
