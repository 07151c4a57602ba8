//! Lifecycle errors

use thiserror::Error;

/// Boxed error produced by a user callback.
pub type BoxError = Box<dyn std::error::Error>;

/// Result type for lifecycle transitions.
pub type LifecycleResult = Result<(), LifecycleError>;

/// Errors surfaced by lifecycle transitions.
///
/// Each variant wraps whatever the corresponding user callback failed with.
/// Failures are reported once through the element's `*Error` notification and
/// then returned to the caller; nothing is retried.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("load callback failed")]
    Load(#[source] BoxError),
    #[error("show callback failed")]
    Show(#[source] BoxError),
    #[error("hide callback failed")]
    Hide(#[source] BoxError),
}

impl LifecycleError {
    /// The underlying callback error.
    pub fn callback_error(&self) -> &(dyn std::error::Error + 'static) {
        match self {
            Self::Load(e) | Self::Show(e) | Self::Hide(e) => e.as_ref(),
        }
    }
}
