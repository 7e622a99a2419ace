//! Vellum - A live-formatting WYSIWYG Markdown editing core
//!
//! Vellum keeps a visual document tree synchronized with Markdown source,
//! applying Markdown-style formatting live as the user types: `# ` at the
//! start of a line becomes a heading, `**bold**` collapses into a bold
//! span the moment the closing delimiter lands, and so on for bullet
//! lists, blockquotes, italics, and inline code.
//!
//! # Architecture
//! - **Trigger detection** inspects the text around the caret after each
//!   character insertion and classifies it against a fixed pattern set.
//! - **Structural rewriting** splices the matched span into a structural
//!   or inline element, preserving leftover text and repositioning the
//!   caret deterministically.
//! - A **mutation guard** keeps the rewriter's own tree mutations from
//!   re-entering detection, and a **change debouncer** coalesces edit
//!   bursts into single save notifications toward the document store.
//!
//! # Example
//! ```ignore
//! use vellum::EditorSession;
//!
//! let mut session = EditorSession::new();
//! session.focus();
//! session.insert_text("# ");
//! session.insert_text("Hello");
//! assert_eq!(session.get_markdown(), "# Hello\n");
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod persistence;
pub mod render;
pub mod string_utils;
pub mod tree;

pub use config::Settings;
pub use editor::EditorSession;
pub use error::{Error, Result};
pub use persistence::{DocumentStore, FileStore, MemoryStore};
pub use tree::{ElementKind, NodeData, VisualTree};
