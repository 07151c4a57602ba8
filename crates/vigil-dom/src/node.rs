//! Element and text nodes

use std::collections::HashMap;

use crate::ElementId;

/// A node in the element tree.
#[derive(Debug)]
pub struct Node {
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn element(tag: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new(tag)),
        }
    }

    pub(crate) fn text(content: String) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text(content),
        }
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node payload.
#[derive(Debug)]
pub enum NodeData {
    /// Element with identity, presentation and managed state.
    Element(ElementData),
    /// Text content.
    Text(String),
}

/// Element payload: identity, presentation, user properties, and the managed
/// lifecycle flags.
#[derive(Debug, PartialEq)]
pub struct ElementData {
    /// Tag name.
    pub tag: String,
    /// Optional id attribute.
    pub id: Option<String>,
    /// Class list, duplicate-free.
    pub classes: Vec<String>,
    /// Inline style properties.
    pub style: Vec<(String, String)>,
    /// User-defined property bag.
    pub props: HashMap<String, PropValue>,
    /// Managed lifecycle flags.
    pub state: ManagedState,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            style: Vec::new(),
            props: HashMap::new(),
            state: ManagedState::default(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a class, returning whether it is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style(&mut self, name: &str, value: &str) {
        for (n, v) in self.style.iter_mut() {
            if n == name {
                *v = value.to_string();
                return;
            }
        }
        self.style.push((name.to_string(), value.to_string()));
    }

    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    pub fn set_prop(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.props.insert(name.into(), value.into());
    }
}

/// Managed lifecycle flags.
///
/// `show_pending` and `hide_pending` are the re-entrancy guards for the
/// corresponding transitions; at most one of them is set at any time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManagedState {
    pub shown: bool,
    pub show_pending: bool,
    pub hide_pending: bool,
    pub loaded: bool,
    pub loading: bool,
}

/// User-defined property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PropValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}
