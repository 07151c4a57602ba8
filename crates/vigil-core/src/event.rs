//! Events
//!
//! Dispatch payload with explicit propagation flags. Stopping propagation
//! sets a flag the dispatch loop consults before every handler and before
//! every step of the outward walk; handlers never patch the event object.

use vigil_dom::ElementId;

/// Lifecycle notification names.
///
/// These are the wire contract: they are dispatched on the element itself
/// and do not bubble.
pub mod names {
    pub const LOADING: &str = "loading";
    pub const LOADED: &str = "loaded";
    pub const LOAD_ERROR: &str = "loadError";
    pub const SHOWING: &str = "showing";
    pub const SHOWN: &str = "shown";
    pub const SHOW_ERROR: &str = "showError";
    pub const HIDDEN: &str = "hidden";
    pub const HIDE_ERROR: &str = "hideError";

    pub(crate) const NON_BUBBLING: &[&str] = &[
        LOADING, LOADED, LOAD_ERROR, SHOWING, SHOWN, SHOW_ERROR, HIDDEN, HIDE_ERROR,
    ];
}

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    target: ElementId,
    current_target: Option<ElementId>,
    delegator_target: Option<ElementId>,
    error: Option<String>,
    bubbles: bool,
    propagation_stopped: bool,
    immediate_stopped: bool,
    default_prevented: bool,
}

impl Event {
    pub(crate) fn new(name: &str, target: ElementId) -> Self {
        Self {
            name: name.to_string(),
            target,
            current_target: None,
            delegator_target: None,
            error: None,
            bubbles: !names::NON_BUBBLING.contains(&name),
            propagation_stopped: false,
            immediate_stopped: false,
            default_prevented: false,
        }
    }

    pub(crate) fn with_error(name: &str, target: ElementId, error: String) -> Self {
        let mut event = Self::new(name, target);
        event.error = Some(error);
        event
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the event originated on.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// The element whose listener group is currently running.
    pub fn current_target(&self) -> Option<ElementId> {
        self.current_target
    }

    /// The node the running handler's selector matched.
    pub fn delegator_target(&self) -> Option<ElementId> {
        self.delegator_target
    }

    /// Error text carried by `*Error` lifecycle notifications.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Halt the remaining handlers of this dispatch and the outward walk.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped || self.immediate_stopped
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub(crate) fn set_current_target(&mut self, el: ElementId) {
        self.current_target = Some(el);
    }

    pub(crate) fn set_delegator_target(&mut self, el: ElementId) {
        self.delegator_target = Some(el);
    }
}
