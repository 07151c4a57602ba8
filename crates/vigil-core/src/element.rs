//! Element factory
//!
//! Configuration-driven creation of managed elements: one call wires the
//! node, its presentation, its lifecycle hooks, its delegated listeners, and
//! its registry entry.

use std::rc::Rc;

use tracing::debug;

use vigil_dom::{DomError, DomResult, ElementId, PropValue};

use crate::error::BoxError;
use crate::event::Event;
use crate::lifecycle::LoadOptions;
use crate::listeners::EventHandler;
use crate::registry::RegistryEntry;
use crate::runtime::Runtime;

/// Callback run at a lifecycle stage.
pub type LifecycleCallback = Rc<dyn Fn(&mut Runtime, ElementId) -> Result<(), BoxError>>;

/// Per-element user hooks.
#[derive(Default, Clone)]
pub(crate) struct LifecycleHooks {
    pub load: Option<LifecycleCallback>,
    pub show: Option<LifecycleCallback>,
    pub hide: Option<LifecycleCallback>,
    pub unload: Option<LifecycleCallback>,
}

/// Configuration consumed by [`Runtime::create_element`].
#[derive(Default)]
pub struct ElementConfig {
    existing: Option<ElementId>,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    props: Vec<(String, PropValue)>,
    hooks: LifecycleHooks,
    show_on_resume: bool,
    listeners: Vec<(String, String, EventHandler)>,
}

impl ElementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing element instead of creating a node.
    pub fn existing(mut self, element: ElementId) -> Self {
        self.existing = Some(element);
        self
    }

    /// Tag name for the created node; defaults to `div`.
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn style(mut self, name: &str, value: &str) -> Self {
        self.style.push((name.to_string(), value.to_string()));
        self
    }

    /// Seed the element's property bag.
    pub fn prop(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.props.push((name.to_string(), value.into()));
        self
    }

    pub fn on_load(
        mut self,
        cb: impl Fn(&mut Runtime, ElementId) -> Result<(), BoxError> + 'static,
    ) -> Self {
        self.hooks.load = Some(Rc::new(cb));
        self
    }

    pub fn on_show(
        mut self,
        cb: impl Fn(&mut Runtime, ElementId) -> Result<(), BoxError> + 'static,
    ) -> Self {
        self.hooks.show = Some(Rc::new(cb));
        self
    }

    pub fn on_hide(
        mut self,
        cb: impl Fn(&mut Runtime, ElementId) -> Result<(), BoxError> + 'static,
    ) -> Self {
        self.hooks.hide = Some(Rc::new(cb));
        self
    }

    pub fn on_unload(
        mut self,
        cb: impl Fn(&mut Runtime, ElementId) -> Result<(), BoxError> + 'static,
    ) -> Self {
        self.hooks.unload = Some(Rc::new(cb));
        self
    }

    /// Re-show the element whenever the application resume signal fires.
    pub fn show_on_resume(mut self, on: bool) -> Self {
        self.show_on_resume = on;
        self
    }

    /// Register a delegated listener at creation time. An empty selector
    /// targets the element itself.
    pub fn listener(
        mut self,
        event: &str,
        selector: &str,
        handler: impl Fn(&mut Runtime, &mut Event) -> Result<(), BoxError> + 'static,
    ) -> Self {
        self.listeners
            .push((event.to_string(), selector.to_string(), Rc::new(handler)));
        self
    }
}

impl Runtime {
    /// Create (or adopt) a managed element.
    ///
    /// The returned element is detached and ready for insertion; attachment
    /// is what eventually drives its show.
    pub fn create_element(&mut self, config: ElementConfig) -> DomResult<ElementId> {
        let element = match config.existing {
            Some(el) => {
                if !self.document.is_alive(el) {
                    return Err(DomError::NotFound);
                }
                el
            }
            None => self
                .document
                .create_element(config.tag.as_deref().unwrap_or("div")),
        };

        {
            let data = self.document.element_mut(element)?;
            if let Some(id) = config.id {
                data.id = Some(id);
            }
            for class in &config.classes {
                data.add_class(class);
            }
            for (name, value) in &config.style {
                data.set_style(name, value);
            }
            for (name, value) in config.props {
                data.set_prop(name, value);
            }
        }

        self.hooks.insert(element, config.hooks);
        for (event, selector, handler) in config.listeners {
            self.listeners.add(element, &event, &selector, handler);
        }

        // Insert-or-replace: running setup twice swaps the subscription
        // instead of accumulating duplicates.
        if config.show_on_resume {
            self.resume_set.insert(element);
        } else {
            self.resume_set.remove(&element);
        }

        let show = Rc::new(move |rt: &mut Runtime| rt.show(element, LoadOptions::default()));
        let hide = Rc::new(move |rt: &mut Runtime| rt.hide(element));
        self.registry.register(RegistryEntry {
            element,
            show,
            hide,
        });

        debug!(element = element.index(), "managed element created");
        Ok(element)
    }
}
