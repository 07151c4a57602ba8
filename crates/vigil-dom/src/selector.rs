//! Simple selectors
//!
//! Tag, class, id, and universal matching for delegation lookups. Selectors
//! are evaluated per query against live element data, never cached.

use crate::{Document, ElementId, Node};

/// A parsed simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

impl Selector {
    /// Parse a selector string. Empty input is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if s == "*" {
            Some(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            Some(Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            Some(Self::Class(class.to_string()))
        } else {
            Some(Self::Tag(s.to_lowercase()))
        }
    }
}

impl Document {
    /// Check whether `el` matches `selector`.
    pub fn matches(&self, el: ElementId, selector: &Selector) -> bool {
        let Some(data) = self.get(el).and_then(Node::as_element) else {
            return false;
        };
        match selector {
            Selector::Universal => true,
            Selector::Tag(tag) => data.tag.eq_ignore_ascii_case(tag),
            Selector::Id(id) => data.id.as_deref() == Some(id),
            Selector::Class(class) => data.has_class(class),
        }
    }

    /// Closest ancestor-or-self of `from` matching `selector`, searching no
    /// higher than `bound`.
    pub fn closest_within(
        &self,
        from: ElementId,
        selector: &Selector,
        bound: ElementId,
    ) -> Option<ElementId> {
        let mut current = Some(from);
        while let Some(id) = current {
            if self.matches(id, selector) {
                return Some(id);
            }
            if id == bound {
                return None;
            }
            current = self.get(id).and_then(Node::parent);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Selector::parse("div"), Some(Selector::Tag("div".into())));
        assert_eq!(Selector::parse(".item"), Some(Selector::Class("item".into())));
        assert_eq!(Selector::parse("#main"), Some(Selector::Id("main".into())));
        assert_eq!(Selector::parse("*"), Some(Selector::Universal));
        assert_eq!(Selector::parse(""), None);
        assert_eq!(Selector::parse("  "), None);
    }

    #[test]
    fn test_matches() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        {
            let data = doc.element_mut(el).unwrap();
            data.id = Some("main".to_string());
            data.add_class("active");
        }

        assert!(doc.matches(el, &Selector::Tag("DIV".into())));
        assert!(doc.matches(el, &Selector::Id("main".into())));
        assert!(doc.matches(el, &Selector::Class("active".into())));
        assert!(doc.matches(el, &Selector::Universal));
        assert!(!doc.matches(el, &Selector::Class("other".into())));
    }

    #[test]
    fn test_closest_within_respects_bound() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let owner = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.element_mut(outer).unwrap().add_class("hit");
        doc.append_child(doc.root(), outer).unwrap();
        doc.append_child(outer, owner).unwrap();
        doc.append_child(owner, inner).unwrap();

        let sel = Selector::Class("hit".into());
        // The only .hit node sits above the owner, so a bounded search
        // must not see it.
        assert_eq!(doc.closest_within(inner, &sel, owner), None);
        assert_eq!(doc.closest_within(inner, &sel, outer), Some(outer));

        doc.element_mut(inner).unwrap().add_class("hit");
        assert_eq!(doc.closest_within(inner, &sel, owner), Some(inner));
    }
}
