//! Node data for the visual document tree
//!
//! A node is either a text run (a contiguous span of plain characters) or a
//! structural/inline element. The element set mirrors what the Markdown
//! renderer and serializer support: headings, lists, blockquotes, emphasis,
//! inline and fenced code, and soft line breaks.

// ─────────────────────────────────────────────────────────────────────────────
// Element Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of a structural or inline element in the visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Root document node; exactly one per tree
    Document,
    /// Paragraph block
    Paragraph,
    /// Heading block with level 1-6
    Heading(u8),
    /// Unordered list container
    List,
    /// Single list item inside a list
    ListItem,
    /// Blockquote block
    Blockquote,
    /// Fenced code block with an optional language tag
    CodeBlock { language: String },
    /// Bold emphasis span
    Strong,
    /// Italic emphasis span
    Emphasis,
    /// Inline code span
    CodeSpan,
    /// Soft line break within a block
    SoftBreak,
}

impl ElementKind {
    /// Whether this element is a block-level container (as opposed to an
    /// inline span or a break).
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            ElementKind::Document
                | ElementKind::Paragraph
                | ElementKind::Heading(_)
                | ElementKind::List
                | ElementKind::ListItem
                | ElementKind::Blockquote
                | ElementKind::CodeBlock { .. }
        )
    }

    /// Whether this element is an inline span (bold/italic/code).
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            ElementKind::Strong | ElementKind::Emphasis | ElementKind::CodeSpan
        )
    }

    /// The HTML tag name for this element.
    ///
    /// Headings map to `h1`-`h6` with out-of-range levels clamped.
    pub fn tag_name(&self) -> &'static str {
        match self {
            ElementKind::Document => "div",
            ElementKind::Paragraph => "p",
            ElementKind::Heading(1) => "h1",
            ElementKind::Heading(2) => "h2",
            ElementKind::Heading(3) => "h3",
            ElementKind::Heading(4) => "h4",
            ElementKind::Heading(5) => "h5",
            ElementKind::Heading(_) => "h6",
            ElementKind::List => "ul",
            ElementKind::ListItem => "li",
            ElementKind::Blockquote => "blockquote",
            ElementKind::CodeBlock { .. } => "pre",
            ElementKind::Strong => "strong",
            ElementKind::Emphasis => "em",
            ElementKind::CodeSpan => "code",
            ElementKind::SoftBreak => "br",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Data
// ─────────────────────────────────────────────────────────────────────────────

/// Payload of a single node in the visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// A structural or inline element
    Element(ElementKind),
    /// A text run: the unit the detector reads and the rewriter splits
    Text(String),
}

impl NodeData {
    /// Whether this node is a text run.
    pub fn is_text(&self) -> bool {
        matches!(self, NodeData::Text(_))
    }

    /// The text of this run, or `None` for elements.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeData::Text(text) => Some(text.as_str()),
            NodeData::Element(_) => None,
        }
    }

    /// The element kind, or `None` for text runs.
    pub fn as_element(&self) -> Option<&ElementKind> {
        match self {
            NodeData::Element(kind) => Some(kind),
            NodeData::Text(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
