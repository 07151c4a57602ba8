//! Vigil Core - element lifecycle runtime
//!
//! Attaches lifecycle semantics (load/show/hide) and delegated event
//! handling to elements of a [`vigil_dom::Document`]. One [`Runtime`] owns
//! the document, a liveness-tracked registry of managed elements, an
//! attachment observer fed by coalesced mutation batches, and a
//! single-threaded task queue.
//!
//! ```
//! use vigil_core::{ElementConfig, Runtime};
//!
//! let mut rt = Runtime::new();
//! rt.initialize();
//!
//! let el = rt
//!     .create_element(
//!         ElementConfig::new()
//!             .class("panel")
//!             .on_show(|rt, el| {
//!                 rt.set_text(el, "hello")?;
//!                 Ok(())
//!             }),
//!     )
//!     .unwrap();
//!
//! rt.append_to_root(el).unwrap();
//! rt.run_until_idle().unwrap();
//! assert!(rt.document().element(el).unwrap().state.shown);
//! ```

mod dispatch;
mod element;
mod error;
mod event;
mod lifecycle;
mod listeners;
mod observer;
mod registry;
mod runtime;
mod scheduler;

pub use element::{ElementConfig, LifecycleCallback};
pub use error::{BoxError, LifecycleError, LifecycleResult};
pub use event::{Event, names};
pub use lifecycle::LoadOptions;
pub use listeners::EventHandler;
pub use runtime::Runtime;

pub use vigil_dom::{
    Document, DomError, DomResult, ElementData, ElementId, ManagedState, PropValue, Selector,
};
