//! Rendering and serialization collaborators
//!
//! This module implements the content-exchange boundary of the editing
//! core: Markdown source in (building the visual tree), Markdown and HTML
//! out (serializing the visual tree), with syntect-based highlighting for
//! fenced code blocks on the HTML path.

mod html;
mod markdown;
mod serialize;
mod syntax;

pub use html::to_html;
pub use markdown::{build_tree, MarkdownOptions};
pub use serialize::to_markdown;
pub use syntax::{get_highlighter, SyntaxHighlighter};

use crate::tree::{ElementKind, NodeData, VisualTree};
use indextree::NodeId;

// ─────────────────────────────────────────────────────────────────────────────
// Block Grouping
// ─────────────────────────────────────────────────────────────────────────────

/// One top-level unit of the document for serialization purposes.
///
/// Live editing leaves bare text runs and inline elements directly under
/// the root (the user types plain text between block elements). Both
/// serializers treat each maximal span of such nodes as one implicit
/// paragraph.
#[derive(Debug)]
pub(crate) enum BlockGroup {
    /// A proper block element (heading, list, blockquote, ...)
    Element(NodeId),
    /// A run of consecutive inline-level nodes forming an implicit paragraph
    Inline(Vec<NodeId>),
}

/// Partition the root's children into block elements and implicit
/// paragraphs of consecutive inline-level nodes.
pub(crate) fn block_groups(tree: &VisualTree) -> Vec<BlockGroup> {
    let mut groups = Vec::new();
    let mut current: Vec<NodeId> = Vec::new();

    for child in tree.children(tree.root()) {
        let is_block_element = matches!(
            tree.data(child),
            Some(NodeData::Element(kind)) if kind.is_block()
        );

        if is_block_element {
            if !current.is_empty() {
                groups.push(BlockGroup::Inline(std::mem::take(&mut current)));
            }
            groups.push(BlockGroup::Element(child));
        } else {
            current.push(child);
        }
    }

    if !current.is_empty() {
        groups.push(BlockGroup::Inline(current));
    }

    groups
}

/// Whether an inline group holds no visible content (only empty runs, as
/// left behind by caret parking).
pub(crate) fn inline_group_is_empty(tree: &VisualTree, ids: &[NodeId]) -> bool {
    ids.iter().all(|id| match tree.data(*id) {
        Some(NodeData::Text(text)) => text.is_empty(),
        Some(NodeData::Element(ElementKind::SoftBreak)) => true,
        _ => false,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
