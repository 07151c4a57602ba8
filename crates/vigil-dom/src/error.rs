//! Structural operation errors

use thiserror::Error;

/// Result type for tree operations.
pub type DomResult<T> = Result<T, DomError>;

/// Tree operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    /// Handle does not resolve to a live node.
    #[error("node not found")]
    NotFound,
    /// Operation would create a cycle or detach the root.
    #[error("hierarchy request error")]
    HierarchyRequest,
    /// Reference node is not a child of the target.
    #[error("node is not a child")]
    NotAChild,
    /// Text operation on an element, or element operation on text.
    #[error("invalid node type")]
    InvalidNodeType,
}
