//! The visual document tree
//!
//! This is the live, mutable tree of structural and inline nodes the user
//! edits directly, as opposed to its Markdown serialization. It is owned
//! exclusively by the editor session and mutated only by the structural
//! rewriter and by text insertion from keystrokes.
//!
//! Nodes live in an `indextree` arena; `NodeId` handles stay cheap to copy
//! and remain valid (but detached) after removal, which is exactly the
//! "benign race" shape the rewriter has to tolerate.

mod node;

pub use node::{ElementKind, NodeData};

use indextree::{Arena, NodeId};

// ─────────────────────────────────────────────────────────────────────────────
// Visual Tree
// ─────────────────────────────────────────────────────────────────────────────

/// The visual document tree: an arena of nodes plus the root handle.
///
/// All structural mutation goes through this type so that splice operations
/// stay together in one place and the arena never leaks to callers.
#[derive(Debug)]
pub struct VisualTree {
    arena: Arena<NodeData>,
    root: NodeId,
}

impl Default for VisualTree {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualTree {
    /// Create an empty document tree containing only the root node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::Element(ElementKind::Document));
        Self { arena, root }
    }

    /// The root document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the document has no content at all.
    pub fn is_empty(&self) -> bool {
        self.root.children(&self.arena).next().is_none()
    }

    /// Drop all content, leaving a fresh root.
    pub fn clear(&mut self) {
        let mut arena = Arena::new();
        self.root = arena.new_node(NodeData::Element(ElementKind::Document));
        self.arena = arena;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node Construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate a new, detached text run.
    pub fn new_text(&mut self, text: impl Into<String>) -> NodeId {
        self.arena.new_node(NodeData::Text(text.into()))
    }

    /// Allocate a new, detached element.
    pub fn new_element(&mut self, kind: ElementKind) -> NodeId {
        self.arena.new_node(NodeData::Element(kind))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node Access
    // ─────────────────────────────────────────────────────────────────────────

    /// The payload of a node, if it exists and has not been removed.
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
    }

    /// The text of a run, or `None` for elements and removed nodes.
    pub fn text_of(&self, id: NodeId) -> Option<&str> {
        self.data(id).and_then(NodeData::as_text)
    }

    /// The element kind of a node, or `None` for text runs and removed nodes.
    pub fn element_kind(&self, id: NodeId) -> Option<&ElementKind> {
        self.data(id).and_then(NodeData::as_element)
    }

    /// Replace the text of a run. Returns false if the node is not a text run.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        match self.arena.get_mut(id).map(|node| node.get_mut()) {
            Some(NodeData::Text(current)) => {
                *current = text.into();
                true
            }
            _ => false,
        }
    }

    /// Parent of a node, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .and_then(|node| node.parent())
    }

    /// Whether a node is still reachable from the root.
    ///
    /// A node that was removed, or spliced out of the tree, is detached; the
    /// rewriter treats operations on detached runs as no-ops.
    pub fn is_attached(&self, id: NodeId) -> bool {
        match self.arena.get(id) {
            Some(node) if !node.is_removed() => {
                id.ancestors(&self.arena).any(|ancestor| ancestor == self.root)
            }
            _ => false,
        }
    }

    /// Child nodes in document order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// First child of a node.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        id.children(&self.arena).next()
    }

    /// Next sibling of a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.next_sibling())
    }

    /// Previous sibling of a node.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.previous_sibling())
    }

    /// Concatenated text of all runs under `id`, with soft breaks as `\n`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node_id in id.descendants(&self.arena) {
            match self.data(node_id) {
                Some(NodeData::Text(text)) => out.push_str(text),
                Some(NodeData::Element(ElementKind::SoftBreak)) => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// The last text run in document order, if any.
    pub fn last_text_run(&self) -> Option<NodeId> {
        self.last_text_run_in(self.root)
    }

    /// The last text run in document order within the subtree rooted at `id`.
    pub fn last_text_run_in(&self, id: NodeId) -> Option<NodeId> {
        id.descendants(&self.arena)
            .filter(|id| self.data(*id).is_some_and(NodeData::is_text))
            .last()
    }

    /// Total number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.root.descendants(&self.arena).count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Structural Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    /// Insert `new` as the sibling immediately before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, new: NodeId) {
        anchor.insert_before(new, &mut self.arena);
    }

    /// Insert `new` as the sibling immediately after `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, new: NodeId) {
        anchor.insert_after(new, &mut self.arena);
    }

    /// Remove a node and its whole subtree from the tree.
    pub fn remove(&mut self, id: NodeId) {
        id.remove_subtree(&mut self.arena);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
