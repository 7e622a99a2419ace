//! Caret tracking and cursor anchoring
//!
//! The caret is a `(text run, byte offset)` pair identifying where the next
//! insertion lands. The structural rewriter never touches caret bookkeeping
//! directly; it goes through the two-operation `CursorAnchor` trait, which
//! keeps the transform logic independent of how the session stores its
//! selection state.
//!
//! Invariant: after any rewrite, the caret references a live text run inside
//! the tree, never a detached or removed node.

use crate::string_utils::floor_char_boundary;
use crate::tree::VisualTree;
use indextree::NodeId;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Caret Position
// ─────────────────────────────────────────────────────────────────────────────

/// A caret position: the containing text run and a byte offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    /// The text run that holds the caret
    pub node: NodeId,
    /// Byte offset within the run, always on a UTF-8 character boundary
    pub offset: usize,
}

impl Caret {
    /// Create a caret at the given run and offset.
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cursor Anchor
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic caret repositioning used by the structural rewriter.
///
/// Exactly two anchor points exist:
/// - at the end of a node's text content (block transforms, so typing
///   continues inside the new heading/list item/blockquote), and
/// - immediately after a node (inline transforms, so typing continues as
///   plain text following the formatted span).
pub trait CursorAnchor {
    /// Place the caret at the end of the last text run inside `node`.
    fn place_at_content_end(&mut self, tree: &VisualTree, node: NodeId);

    /// Place the caret at the start of the text run immediately after `node`.
    fn place_after(&mut self, tree: &VisualTree, node: NodeId);
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Caret
// ─────────────────────────────────────────────────────────────────────────────

/// The editor session's caret state.
#[derive(Debug, Default)]
pub struct SessionCaret {
    position: Option<Caret>,
}

impl SessionCaret {
    /// Create an unset caret.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current caret position, if any.
    pub fn position(&self) -> Option<Caret> {
        self.position
    }

    /// Move the caret, clamping the offset to a character boundary within
    /// the target run. Setting a caret into a non-text node clears it.
    pub fn set(&mut self, tree: &VisualTree, node: NodeId, offset: usize) {
        match tree.text_of(node) {
            Some(text) => {
                self.position = Some(Caret::new(node, floor_char_boundary(text, offset)));
            }
            None => {
                debug!("Caret target is not a text run; clearing caret");
                self.position = None;
            }
        }
    }

    /// Clear the caret.
    pub fn clear(&mut self) {
        self.position = None;
    }

    /// Whether the caret currently references a live text run.
    pub fn is_valid(&self, tree: &VisualTree) -> bool {
        self.position
            .is_some_and(|caret| tree.is_attached(caret.node) && tree.text_of(caret.node).is_some())
    }
}

impl CursorAnchor for SessionCaret {
    fn place_at_content_end(&mut self, tree: &VisualTree, node: NodeId) {
        match tree.last_text_run_in(node) {
            Some(run) => {
                let len = tree.text_of(run).map(str::len).unwrap_or(0);
                self.set(tree, run, len);
            }
            None => {
                debug!("No text run inside anchor target; clearing caret");
                self.position = None;
            }
        }
    }

    fn place_after(&mut self, tree: &VisualTree, node: NodeId) {
        match tree.next_sibling(node) {
            Some(next) if tree.text_of(next).is_some() => self.set(tree, next, 0),
            _ => {
                debug!("No text run after anchor target; clearing caret");
                self.position = None;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
