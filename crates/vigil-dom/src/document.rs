//! Document - owning context for one element tree
//!
//! All structural changes go through the document and leave a mutation
//! record behind; an observing runtime drains those records in batches.

use tracing::trace;

use crate::arena::Arena;
use crate::{DomError, DomResult, ElementData, ElementId, MutationRecord, Node, NodeData};

/// An owned element tree with a single root container.
pub struct Document {
    arena: Arena,
    root: ElementId,
    records: Vec<MutationRecord>,
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::element("root"));
        Self {
            arena,
            root,
            records: Vec::new(),
        }
    }

    /// The root container every attached element descends from.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Whether `id` still resolves to a live node.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.arena.contains(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Node> {
        self.arena.get(id)
    }

    fn node(&self, id: ElementId) -> DomResult<&Node> {
        self.arena.get(id).ok_or(DomError::NotFound)
    }

    fn node_mut(&mut self, id: ElementId) -> DomResult<&mut Node> {
        self.arena.get_mut(id).ok_or(DomError::NotFound)
    }

    /// Element data of `id`.
    pub fn element(&self, id: ElementId) -> DomResult<&ElementData> {
        self.node(id)?.as_element().ok_or(DomError::InvalidNodeType)
    }

    /// Mutable element data of `id`.
    pub fn element_mut(&mut self, id: ElementId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = self.arena.insert(Node::element(tag));
        trace!(tag, index = id.index(), "created element");
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> ElementId {
        self.arena.insert(Node::text(content.to_string()))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved, recording its removal
    /// from the old position first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` under `parent`; `None` appends.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> DomResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if child == self.root || child == parent || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(child)?;

        let parent_node = self.node_mut(parent)?;
        let position = match reference {
            Some(r) => parent_node
                .children
                .iter()
                .position(|&c| c == r)
                .ok_or(DomError::NotAChild)?,
            None => parent_node.children.len(),
        };
        parent_node.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);

        self.records.push(MutationRecord::added(parent, child));
        trace!(parent = parent.index(), child = child.index(), "inserted node");
        Ok(())
    }

    /// Remove `child` from its parent. Detaching an already detached node is
    /// a no-op.
    pub fn detach(&mut self, child: ElementId) -> DomResult<()> {
        let Some(parent) = self.node(child)?.parent else {
            return Ok(());
        };
        if let Ok(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&c| c != child);
        }
        self.node_mut(child)?.parent = None;
        self.records.push(MutationRecord::removed(parent, child));
        trace!(parent = parent.index(), child = child.index(), "detached node");
        Ok(())
    }

    /// Detach `id` and release its slot along with its whole subtree.
    ///
    /// All outstanding handles into the subtree go stale.
    pub fn free(&mut self, id: ElementId) -> DomResult<()> {
        if id == self.root {
            return Err(DomError::HierarchyRequest);
        }
        self.detach(id)?;
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: ElementId) {
        if let Some(node) = self.arena.remove(id) {
            for child in node.children {
                self.free_subtree(child);
            }
        }
    }

    /// Whether `id` is contained in the tree rooted at the document root.
    ///
    /// Containment is a property of the whole document: a node moved to any
    /// other attached parent stays attached.
    pub fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.get(current).and_then(Node::parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn is_ancestor_of(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = self.get(node).and_then(Node::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(Node::parent);
        }
        false
    }

    /// `id` followed by its ancestors, innermost first.
    pub fn self_and_ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            if !self.is_alive(c) {
                break;
            }
            chain.push(c);
            current = self.get(c).and_then(Node::parent);
        }
        chain
    }

    /// Number of parent steps from `from` up to `ancestor` (0 when equal).
    pub fn distance(&self, from: ElementId, ancestor: ElementId) -> Option<u32> {
        let mut steps = 0;
        let mut current = from;
        loop {
            if current == ancestor {
                return Some(steps);
            }
            current = self.get(current).and_then(Node::parent)?;
            steps += 1;
        }
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Replace the element's content with a single text node.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> DomResult<()> {
        self.element(id)?;

        let children = self.node(id)?.children.clone();
        if children.len() == 1 {
            if let Some(node) = self.arena.get_mut(children[0]) {
                if let NodeData::Text(content) = &mut node.data {
                    *content = text.to_string();
                    return Ok(());
                }
            }
        }
        for child in children {
            self.free(child)?;
        }
        let text_node = self.create_text(text);
        self.append_child(id, text_node)
    }

    /// Concatenated text of the subtree under `id`.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        if let Some(text) = node.as_text() {
            out.push_str(text);
        }
        for &child in node.children() {
            self.collect_text(child, out);
        }
    }

    /// First element in document order whose id attribute is `id_attr`.
    pub fn get_element_by_id(&self, id_attr: &str) -> Option<ElementId> {
        self.find_by_id(self.root, id_attr)
    }

    fn find_by_id(&self, start: ElementId, id_attr: &str) -> Option<ElementId> {
        for &child in self.children(start) {
            if let Some(elem) = self.get(child).and_then(Node::as_element) {
                if elem.id.as_deref() == Some(id_attr) {
                    return Some(child);
                }
            }
            if let Some(found) = self.find_by_id(child, id_attr) {
                return Some(found);
            }
        }
        None
    }

    /// Drain all pending mutation records.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn has_pending_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
