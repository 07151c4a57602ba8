//! Runtime context
//!
//! One application-owned object wires the document, the registry, the
//! listener table, and the scheduler together. Construct it at startup and
//! pass it wherever elements are made; there is no module-level state.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use vigil_dom::{Document, DomResult, ElementId};

use crate::element::{LifecycleCallback, LifecycleHooks};
use crate::error::LifecycleResult;
use crate::listeners::ListenerTable;
use crate::observer::AttachmentObserver;
use crate::registry::ElementRegistry;
use crate::scheduler::{Task, TaskQueue};

/// Owning context for a managed element tree.
pub struct Runtime {
    pub(crate) document: Document,
    pub(crate) registry: ElementRegistry,
    pub(crate) listeners: ListenerTable,
    pub(crate) hooks: HashMap<ElementId, LifecycleHooks>,
    pub(crate) resume_set: HashSet<ElementId>,
    pub(crate) queue: TaskQueue,
    pub(crate) observer: AttachmentObserver,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            registry: ElementRegistry::default(),
            listeners: ListenerTable::default(),
            hooks: HashMap::new(),
            resume_set: HashSet::new(),
            queue: TaskQueue::default(),
            observer: AttachmentObserver::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Structural edits made here are observed on
    /// the next scheduling turn like any other mutation.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn root(&self) -> ElementId {
        self.document.root()
    }

    /// Append `element` under the document root.
    pub fn append_to_root(&mut self, element: ElementId) -> DomResult<()> {
        let root = self.document.root();
        self.append_child(root, element)
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.document.append_child(parent, child)?;
        self.note_mutations();
        Ok(())
    }

    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> DomResult<()> {
        self.document.insert_before(parent, child, reference)?;
        self.note_mutations();
        Ok(())
    }

    pub fn detach(&mut self, element: ElementId) -> DomResult<()> {
        self.document.detach(element)?;
        self.note_mutations();
        Ok(())
    }

    /// Release `element` and its subtree. Outstanding handles go stale; the
    /// registry drops its entry on the next batch without triggering hide.
    pub fn free(&mut self, element: ElementId) -> DomResult<()> {
        self.document.free(element)?;
        self.note_mutations();
        Ok(())
    }

    pub fn set_text(&mut self, element: ElementId, text: &str) -> DomResult<()> {
        self.document.set_text(element, text)?;
        self.note_mutations();
        Ok(())
    }

    fn note_mutations(&mut self) {
        if self.observer.is_observing() && self.document.has_pending_records() {
            if self.queue.schedule_batch() {
                trace!("scheduled mutation batch");
            }
        }
    }

    /// Drain scheduled work until the runtime is quiescent.
    ///
    /// Stops at the first failing task, leaving the rest of the queue
    /// intact; calling again resumes where it stopped.
    pub fn run_until_idle(&mut self) -> LifecycleResult {
        loop {
            if let Some(task) = self.queue.pop() {
                self.run_task(task)?;
                continue;
            }
            // Mutations written directly through `document_mut` have no
            // scheduled batch yet; pick them up before going idle.
            if self.observer.is_observing() && self.document.has_pending_records() {
                self.process_batch()?;
                continue;
            }
            return Ok(());
        }
    }

    fn run_task(&mut self, task: Task) -> LifecycleResult {
        match task {
            Task::Load { element, options } => {
                if !self.document.is_alive(element) {
                    trace!(index = element.index(), "dropping load for dead element");
                    return Ok(());
                }
                self.load(element, options)
            }
            Task::Show { element, options } => {
                if !self.document.is_alive(element) {
                    trace!(index = element.index(), "dropping show for dead element");
                    return Ok(());
                }
                self.show(element, options)
            }
            Task::DeliverBatch => self.process_batch(),
        }
    }

    pub(crate) fn hook(
        &self,
        element: ElementId,
        f: impl FnOnce(&LifecycleHooks) -> Option<LifecycleCallback>,
    ) -> Option<LifecycleCallback> {
        self.hooks.get(&element).and_then(f)
    }

    /// Number of registered managed elements (dead entries included until
    /// the next purge).
    pub fn managed_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
