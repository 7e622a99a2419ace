//! Visual tree → Markdown serialization
//!
//! The inverse of [`build_tree`](crate::render::build_tree) over the same
//! element set. Block elements become their Markdown prefix form, inline
//! elements get their delimiters back, and maximal spans of bare inline
//! nodes under the root serialize as implicit paragraphs.

use crate::render::{block_groups, inline_group_is_empty, BlockGroup};
use crate::tree::{ElementKind, NodeData, VisualTree};
use indextree::NodeId;

// ─────────────────────────────────────────────────────────────────────────────
// Serialization Entry
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize the whole tree to Markdown text.
///
/// Blocks are separated by blank lines; non-empty output always ends with a
/// single trailing newline.
pub fn to_markdown(tree: &VisualTree) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for group in block_groups(tree) {
        match group {
            BlockGroup::Element(id) => {
                if let Some(text) = serialize_block(tree, id) {
                    blocks.push(text);
                }
            }
            BlockGroup::Inline(ids) => {
                if !inline_group_is_empty(tree, &ids) {
                    blocks.push(serialize_inline_nodes(tree, &ids));
                }
            }
        }
    }

    if blocks.is_empty() {
        String::new()
    } else {
        blocks.join("\n\n") + "\n"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Serialization
// ─────────────────────────────────────────────────────────────────────────────

fn serialize_block(tree: &VisualTree, id: NodeId) -> Option<String> {
    let kind = tree.element_kind(id)?.clone();

    let text = match kind {
        ElementKind::Heading(level) => {
            let marker = "#".repeat(level.clamp(1, 6) as usize);
            let content = serialize_children(tree, id);
            if content.is_empty() {
                marker
            } else {
                format!("{} {}", marker, content)
            }
        }

        ElementKind::Paragraph => serialize_children(tree, id),

        ElementKind::List => tree
            .children(id)
            .into_iter()
            .map(|item| {
                let content = serialize_children(tree, item);
                if content.is_empty() {
                    "-".to_string()
                } else {
                    format!("- {}", content)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),

        ElementKind::Blockquote => {
            let content = serialize_children(tree, id);
            if content.is_empty() {
                ">".to_string()
            } else {
                content
                    .lines()
                    .map(|line| format!("> {}", line))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }

        ElementKind::CodeBlock { language } => {
            let mut literal = tree.text_content(id);
            if !literal.ends_with('\n') {
                literal.push('\n');
            }
            format!("```{}\n{}```", language, literal)
        }

        // Inline elements reaching the root are serialized in place
        ElementKind::Strong | ElementKind::Emphasis | ElementKind::CodeSpan => {
            serialize_inline(tree, id)
        }

        ElementKind::SoftBreak | ElementKind::ListItem | ElementKind::Document => return None,
    };

    Some(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Serialization
// ─────────────────────────────────────────────────────────────────────────────

fn serialize_inline_nodes(tree: &VisualTree, ids: &[NodeId]) -> String {
    ids.iter().map(|id| serialize_inline(tree, *id)).collect()
}

fn serialize_children(tree: &VisualTree, id: NodeId) -> String {
    let children = tree.children(id);
    serialize_inline_nodes(tree, &children)
}

fn serialize_inline(tree: &VisualTree, id: NodeId) -> String {
    match tree.data(id) {
        Some(NodeData::Text(text)) => text.clone(),
        Some(NodeData::Element(kind)) => match kind {
            ElementKind::Strong => format!("**{}**", serialize_children(tree, id)),
            ElementKind::Emphasis => format!("*{}*", serialize_children(tree, id)),
            ElementKind::CodeSpan => format!("`{}`", serialize_children(tree, id)),
            ElementKind::SoftBreak => "\n".to_string(),
            // Nested structure is flattened to its content
            _ => serialize_children(tree, id),
        },
        None => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
