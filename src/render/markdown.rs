//! Markdown parsing into the visual tree
//!
//! This module wraps comrak to build a visual document tree from Markdown
//! source, which is how external content enters the editing session. The
//! supported element set matches what the rest of the core understands:
//! headings, lists, blockquotes, emphasis, inline and fenced code, and soft
//! breaks. Anything else comrak produces (tables, links, raw HTML) is
//! flattened to its text content rather than dropped.

use crate::error::Result;
use crate::tree::{ElementKind, VisualTree};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};
use indextree::NodeId;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Markdown Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for Markdown parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Make URLs safe by removing potentially dangerous protocols
    pub safe_urls: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            safe_urls: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.table = self.tables;
        options.extension.strikethrough = self.strikethrough;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.render.unsafe_ = !self.safe_urls;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Construction
// ─────────────────────────────────────────────────────────────────────────────

/// Parse Markdown text into a fresh visual document tree.
pub fn build_tree(text: &str, options: &MarkdownOptions) -> Result<VisualTree> {
    let arena = Arena::new();
    let document = parse_document(&arena, text, &options.to_comrak_options());

    let mut tree = VisualTree::new();
    let root = tree.root();
    for child in document.children() {
        convert_node(child, &mut tree, root);
    }
    Ok(tree)
}

/// Convert one comrak AST node (and its descendants) under `parent`.
fn convert_node<'a>(node: &'a AstNode<'a>, tree: &mut VisualTree, parent: NodeId) {
    let ast = node.data.borrow();

    match &ast.value {
        NodeValue::Text(text) => {
            let run = tree.new_text(text.clone());
            tree.append_child(parent, run);
        }

        NodeValue::SoftBreak | NodeValue::LineBreak => {
            let brk = tree.new_element(ElementKind::SoftBreak);
            tree.append_child(parent, brk);
        }

        NodeValue::Code(code) => {
            let span = tree.new_element(ElementKind::CodeSpan);
            let literal = tree.new_text(code.literal.clone());
            tree.append_child(span, literal);
            tree.append_child(parent, span);
        }

        NodeValue::Strong => convert_children_into(node, tree, parent, ElementKind::Strong),
        NodeValue::Emph => convert_children_into(node, tree, parent, ElementKind::Emphasis),

        NodeValue::Heading(heading) => {
            convert_children_into(node, tree, parent, ElementKind::Heading(heading.level))
        }

        NodeValue::Paragraph => {
            // comrak wraps list-item and blockquote content in paragraphs;
            // the visual tree keeps that content directly under the item.
            let inside_container = matches!(
                tree.element_kind(parent),
                Some(ElementKind::ListItem) | Some(ElementKind::Blockquote)
            );
            if inside_container {
                for child in node.children() {
                    convert_node(child, tree, parent);
                }
            } else {
                convert_children_into(node, tree, parent, ElementKind::Paragraph);
            }
        }

        NodeValue::List(_) => convert_children_into(node, tree, parent, ElementKind::List),
        NodeValue::Item(_) => convert_children_into(node, tree, parent, ElementKind::ListItem),
        NodeValue::BlockQuote => {
            convert_children_into(node, tree, parent, ElementKind::Blockquote)
        }

        NodeValue::CodeBlock(block) => {
            let element = tree.new_element(ElementKind::CodeBlock {
                language: block.info.clone(),
            });
            let literal = tree.new_text(block.literal.clone());
            tree.append_child(element, literal);
            tree.append_child(parent, element);
        }

        // Unsupported constructs are flattened to their content
        _ => {
            for child in node.children() {
                convert_node(child, tree, parent);
            }
        }
    }
}

fn convert_children_into<'a>(
    node: &'a AstNode<'a>,
    tree: &mut VisualTree,
    parent: NodeId,
    kind: ElementKind,
) {
    let element = tree.new_element(kind);
    for child in node.children() {
        convert_node(child, tree, element);
    }
    tree.append_child(parent, element);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> VisualTree {
        build_tree(text, &MarkdownOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_document() {
        let tree = build("");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_heading_levels() {
        let tree = build("# One\n\n### Three");
        let children = tree.children(tree.root());
        assert_eq!(tree.element_kind(children[0]), Some(&ElementKind::Heading(1)));
        assert_eq!(tree.element_kind(children[1]), Some(&ElementKind::Heading(3)));
        assert_eq!(tree.text_content(children[0]), "One");
    }

    #[test]
    fn test_paragraph_with_emphasis() {
        let tree = build("Some **bold** and *italic* text");
        let paragraph = tree.children(tree.root())[0];
        assert_eq!(
            tree.element_kind(paragraph),
            Some(&ElementKind::Paragraph)
        );

        let kinds: Vec<_> = tree
            .children(paragraph)
            .iter()
            .map(|id| tree.data(*id).cloned().unwrap())
            .collect();
        assert!(kinds
            .iter()
            .any(|data| data.as_element() == Some(&ElementKind::Strong)));
        assert!(kinds
            .iter()
            .any(|data| data.as_element() == Some(&ElementKind::Emphasis)));
        assert_eq!(tree.text_content(paragraph), "Some bold and italic text");
    }

    #[test]
    fn test_list_items_are_unwrapped() {
        let tree = build("- first\n- second");
        let list = tree.children(tree.root())[0];
        assert_eq!(tree.element_kind(list), Some(&ElementKind::List));

        let items = tree.children(list);
        assert_eq!(items.len(), 2);
        // No paragraph wrapper between the item and its text
        let first_child = tree.first_child(items[0]).unwrap();
        assert_eq!(tree.text_of(first_child), Some("first"));
    }

    #[test]
    fn test_blockquote_content_is_unwrapped() {
        let tree = build("> quoted words");
        let quote = tree.children(tree.root())[0];
        assert_eq!(tree.element_kind(quote), Some(&ElementKind::Blockquote));
        assert_eq!(tree.text_content(quote), "quoted words");
    }

    #[test]
    fn test_fenced_code_block_keeps_language() {
        let tree = build("```rust\nfn main() {}\n```");
        let block = tree.children(tree.root())[0];
        assert_eq!(
            tree.element_kind(block),
            Some(&ElementKind::CodeBlock {
                language: "rust".to_string()
            })
        );
        assert_eq!(tree.text_content(block), "fn main() {}\n");
    }

    #[test]
    fn test_inline_code_span() {
        let tree = build("run `ls` now");
        let paragraph = tree.children(tree.root())[0];
        let span = tree
            .children(paragraph)
            .into_iter()
            .find(|id| tree.element_kind(*id) == Some(&ElementKind::CodeSpan))
            .unwrap();
        assert_eq!(tree.text_content(span), "ls");
    }

    #[test]
    fn test_soft_break_between_lines() {
        let tree = build("line one\nline two");
        let paragraph = tree.children(tree.root())[0];
        assert_eq!(tree.text_content(paragraph), "line one\nline two");
    }

    #[test]
    fn test_unsupported_nodes_flatten_to_text() {
        let tree = build("a [link](https://example.com) here");
        let paragraph = tree.children(tree.root())[0];
        assert_eq!(tree.text_content(paragraph), "a link here");
    }
}
