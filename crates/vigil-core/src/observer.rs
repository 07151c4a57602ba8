//! Attachment observation
//!
//! A single observer per runtime watches the document root. Structural
//! changes coalesce into one batch per scheduling turn; each batch re-checks
//! full containment for every registered element instead of replaying
//! per-record deltas.

use tracing::{debug, trace, warn};

use crate::error::LifecycleResult;
use crate::runtime::Runtime;

/// Observation state for the document root.
#[derive(Debug, Default)]
pub(crate) struct AttachmentObserver {
    observing: bool,
}

impl AttachmentObserver {
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn set_observing(&mut self, observing: bool) {
        self.observing = observing;
    }
}

impl Runtime {
    /// Start observing structural changes under the document root.
    ///
    /// Elements already attached when observation starts are picked up by an
    /// immediately scheduled batch.
    pub fn initialize(&mut self) {
        self.observer.set_observing(true);
        self.queue.schedule_batch();
        debug!("attachment observation started");
    }

    /// Flush any pending batch synchronously, then stop observing.
    ///
    /// Draining first means no attach/detach transition that already
    /// happened is lost.
    pub fn teardown(&mut self) -> LifecycleResult {
        let result = if self.observer.is_observing()
            && (self.document.has_pending_records() || self.queue.batch_scheduled())
        {
            self.process_batch()
        } else {
            Ok(())
        };
        self.queue.cancel_batch();
        self.observer.set_observing(false);
        debug!("attachment observation stopped");
        result
    }

    /// Deliver one coalesced batch.
    ///
    /// Dead registry entries are purged first; every survivor is then
    /// diffed: attached but not shown triggers show, detached but shown
    /// triggers hide. One failing trigger does not starve the rest of the
    /// batch; the first error is reported once all entries were visited.
    pub(crate) fn process_batch(&mut self) -> LifecycleResult {
        let records = self.document.take_records();
        let survivors = self.registry.purge_and_collect(&self.document);
        self.hooks.retain(|el, _| self.document.is_alive(*el));
        self.resume_set.retain(|el| self.document.is_alive(*el));
        self.listeners.retain_live(&self.document);
        trace!(
            records = records.len(),
            entries = survivors.len(),
            "processing mutation batch"
        );

        let mut first_error = None;
        for entry in survivors {
            let attached = self.document.is_attached(entry.element);
            let shown = self
                .document
                .element(entry.element)
                .map(|data| data.state.shown)
                .unwrap_or(false);

            let result = if attached && !shown {
                (entry.show)(self)
            } else if !attached && shown {
                (entry.hide)(self)
            } else {
                Ok(())
            };

            if let Err(e) = result {
                warn!(
                    element = entry.element.index(),
                    error = %e,
                    "lifecycle trigger failed during batch"
                );
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
