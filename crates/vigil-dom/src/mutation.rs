//! Mutation records
//!
//! Structural change reports, consumed in coalesced batches by an observing
//! runtime.

use crate::ElementId;

/// One child-list change.
#[derive(Debug, Clone)]
pub struct MutationRecord {
    /// Parent whose child list changed.
    pub target: ElementId,
    /// Nodes inserted under `target`.
    pub added: Vec<ElementId>,
    /// Nodes removed from under `target`.
    pub removed: Vec<ElementId>,
}

impl MutationRecord {
    pub(crate) fn added(target: ElementId, child: ElementId) -> Self {
        Self {
            target,
            added: vec![child],
            removed: Vec::new(),
        }
    }

    pub(crate) fn removed(target: ElementId, child: ElementId) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed: vec![child],
        }
    }
}
