//! Visual tree → HTML fragment export
//!
//! Walks the tree and emits an HTML fragment over the supported element
//! set. Fenced code blocks are routed through the syntax highlighter; any
//! highlighting failure degrades to escaped plain code, never to an error
//! surfaced to the caller.

use crate::config::Settings;
use crate::render::syntax::get_highlighter;
use crate::render::{block_groups, inline_group_is_empty, BlockGroup};
use crate::tree::{ElementKind, NodeData, VisualTree};
use indextree::NodeId;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Export the whole tree as an HTML fragment.
pub fn to_html(tree: &VisualTree, settings: &Settings) -> String {
    let mut out = String::new();

    for group in block_groups(tree) {
        match group {
            BlockGroup::Element(id) => render_block(tree, id, settings, &mut out),
            BlockGroup::Inline(ids) => {
                if !inline_group_is_empty(tree, &ids) {
                    out.push_str("<p>");
                    for id in &ids {
                        render_inline(tree, *id, &mut out);
                    }
                    out.push_str("</p>\n");
                }
            }
        }
    }

    out
}

fn render_block(tree: &VisualTree, id: NodeId, settings: &Settings, out: &mut String) {
    let Some(kind) = tree.element_kind(id).cloned() else {
        return;
    };

    match kind {
        ElementKind::Heading(_) | ElementKind::Paragraph | ElementKind::Blockquote => {
            let tag = kind.tag_name();
            out.push_str(&format!("<{}>", tag));
            render_children(tree, id, out);
            out.push_str(&format!("</{}>\n", tag));
        }

        ElementKind::List => {
            out.push_str("<ul>\n");
            for item in tree.children(id) {
                out.push_str("<li>");
                render_children(tree, item, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }

        ElementKind::CodeBlock { language } => {
            let code = tree.text_content(id);
            match get_highlighter().highlight_to_html(&code, &language, settings) {
                Some(markup) => {
                    out.push_str(&markup);
                    if !markup.ends_with('\n') {
                        out.push('\n');
                    }
                }
                None => {
                    out.push_str("<pre><code>");
                    out.push_str(&escape_html(&code));
                    out.push_str("</code></pre>\n");
                }
            }
        }

        // Inline kinds and stray containers render in place
        _ => render_inline(tree, id, out),
    }
}

fn render_children(tree: &VisualTree, id: NodeId, out: &mut String) {
    for child in tree.children(id) {
        render_inline(tree, child, out);
    }
}

fn render_inline(tree: &VisualTree, id: NodeId, out: &mut String) {
    match tree.data(id) {
        Some(NodeData::Text(text)) => out.push_str(&escape_html(text)),
        Some(NodeData::Element(kind)) => match kind {
            ElementKind::Strong | ElementKind::Emphasis | ElementKind::CodeSpan => {
                let tag = kind.tag_name();
                out.push_str(&format!("<{}>", tag));
                render_children(tree, id, out);
                out.push_str(&format!("</{}>", tag));
            }
            ElementKind::SoftBreak => out.push('\n'),
            _ => render_children(tree, id, out),
        },
        None => {}
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// Escape text content for safe HTML embedding.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{build_tree, MarkdownOptions};

    fn html_for(markdown: &str) -> String {
        let tree = build_tree(markdown, &MarkdownOptions::default()).unwrap();
        to_html(&tree, &Settings::default())
    }

    #[test]
    fn test_heading_markup() {
        assert_eq!(html_for("## Title\n"), "<h2>Title</h2>\n");
    }

    #[test]
    fn test_paragraph_with_inline_markup() {
        assert_eq!(
            html_for("Some **bold** and `code`.\n"),
            "<p>Some <strong>bold</strong> and <code>code</code>.</p>\n"
        );
    }

    #[test]
    fn test_list_markup() {
        assert_eq!(
            html_for("- one\n- two\n"),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_blockquote_markup() {
        assert_eq!(
            html_for("> quoted\n"),
            "<blockquote>quoted</blockquote>\n"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            html_for("a < b & c\n"),
            "<p>a &lt; b &amp; c</p>\n"
        );
    }

    #[test]
    fn test_code_block_is_rendered_as_pre() {
        // Whatever the highlighter does, the output must be a <pre> block
        // that still contains the code text
        let html = html_for("```rust\nfn main() {}\n```\n");
        assert!(html.starts_with("<pre"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_degrades_to_plain_code() {
        let html = html_for("```zzznotalanguage\n<tag> & text\n```\n");
        assert!(html.starts_with("<pre"));
        // Raw angle brackets never leak through unescaped
        assert!(!html.contains("<tag>"));
    }

    #[test]
    fn test_escape_html_helper() {
        assert_eq!(escape_html(r#"<a href="x">'q'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;q&#39;&lt;/a&gt;");
    }
}
