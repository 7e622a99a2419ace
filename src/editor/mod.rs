//! Live-formatting editor session
//!
//! This module owns the editing surface: the visual document tree, the
//! caret, the re-entrancy guard, and the change debouncer. Every raw
//! text-insertion event enters through [`EditorSession::insert_text`], which
//! runs trigger detection per inserted character and hands positive matches
//! to the structural rewriter.
//!
//! # Public Operations
//! - `set_markdown` / `get_markdown` / `get_html`: content exchange with
//!   the host
//! - `focus` / `clear`: session lifecycle
//! - `insert_text`: raw insertion ingress (the live-formatting path)
//! - `load_latest` / `poll_save`: the persistence boundary
//!
//! All detection and rewriting runs synchronously inside the insertion
//! call; no operation suspends mid-transformation.

mod caret;
mod guard;
mod transform;
mod trigger;

pub use caret::{Caret, CursorAnchor, SessionCaret};
pub use guard::MutationGuard;
pub use transform::apply_transform;
pub use trigger::{detect, TriggerKind, TriggerMatch};

use crate::config::Settings;
use crate::error::Result;
use crate::persistence::{ChangeDebouncer, DocumentStore};
use crate::render::{build_tree, to_html, to_markdown};
use crate::string_utils::split_at_boundary;
use crate::tree::VisualTree;
use indextree::NodeId;
use log::debug;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Editor Session
// ─────────────────────────────────────────────────────────────────────────────

/// A single editing session over one visual document tree.
///
/// The tree is owned exclusively by the session and only ever mutated on
/// the caller's thread, so mutual exclusion is structural rather than
/// lock-based.
#[derive(Debug)]
pub struct EditorSession {
    tree: VisualTree,
    caret: SessionCaret,
    guard: MutationGuard,
    debouncer: ChangeDebouncer,
    settings: Settings,
    dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Create an empty session with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create an empty session with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        let settings = settings.validate();
        Self {
            tree: VisualTree::new(),
            caret: SessionCaret::new(),
            guard: MutationGuard::new(Duration::from_millis(settings.settle_window_ms)),
            debouncer: ChangeDebouncer::new(Duration::from_millis(settings.save_quiet_period_ms)),
            settings,
            dirty: false,
        }
    }

    /// The session settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read access to the visual document tree.
    pub fn tree(&self) -> &VisualTree {
        &self.tree
    }

    /// The current caret position, if any.
    pub fn caret(&self) -> Option<Caret> {
        self.caret.position()
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content Exchange
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the whole visual tree from a Markdown string.
    ///
    /// The previous tree is discarded and the caret is cleared; call
    /// [`focus`](Self::focus) afterwards to resume typing.
    pub fn set_markdown(&mut self, text: &str) -> Result<()> {
        self.tree = build_tree(text, &self.settings.markdown)?;
        self.caret.clear();
        self.dirty = false;
        Ok(())
    }

    /// Serialize the current visual tree back to Markdown.
    pub fn get_markdown(&self) -> String {
        to_markdown(&self.tree)
    }

    /// Export the current visual tree as an HTML fragment.
    ///
    /// Fenced code blocks are syntax-highlighted; highlighting failures
    /// degrade to plain escaped code.
    pub fn get_html(&self) -> String {
        to_html(&self.tree, &self.settings)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Give the session input focus: place the caret at the end of the last
    /// text run, creating an empty run when the document has none.
    pub fn focus(&mut self) {
        match self.tree.last_text_run() {
            Some(run) => {
                let len = self.tree.text_of(run).map(str::len).unwrap_or(0);
                self.caret.set(&self.tree, run, len);
            }
            None => {
                let run = self.tree.new_text("");
                let root = self.tree.root();
                self.tree.append_child(root, run);
                self.caret.set(&self.tree, run, 0);
            }
        }
    }

    /// Reset to an empty document.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.caret.clear();
        self.dirty = true;
        self.debouncer.note_change();
    }

    /// Move the caret to an explicit position inside a text run.
    ///
    /// The host owns selection; this is how it reports caret placement back
    /// to the core. Positions inside elements clear the caret.
    pub fn set_caret(&mut self, node: NodeId, offset: usize) {
        self.caret.set(&self.tree, node, offset);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw Insertion Ingress
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert text at the caret, character by character, running trigger
    /// detection after each insertion.
    ///
    /// Without a caret (or with a caret left on a detached node) this is a
    /// no-op: detection only runs when the caret sits inside a live plain
    /// text run directly under the root, never inside an already-formatted
    /// element. While the mutation guard is suppressing, insertions still
    /// land in the tree but are treated as rewrite side effects and never
    /// re-enter detection.
    pub fn insert_text(&mut self, input: &str) {
        if !self.caret.is_valid(&self.tree) {
            debug!("insert_text without a valid caret; ignoring");
            return;
        }

        for c in input.chars() {
            let Some(position) = self.caret.position() else {
                debug!("Caret lost mid-insertion; stopping");
                return;
            };
            let Some(text) = self.tree.text_of(position.node) else {
                debug!("Caret container vanished mid-insertion; stopping");
                return;
            };

            // Native insertion: splice the character into the run.
            let (left, right) = split_at_boundary(text, position.offset);
            let mut updated = String::with_capacity(text.len() + c.len_utf8());
            updated.push_str(left);
            updated.push(c);
            updated.push_str(right);
            let new_offset = left.len() + c.len_utf8();

            self.tree.set_text(position.node, updated.clone());
            self.caret.set(&self.tree, position.node, new_offset);
            self.dirty = true;
            self.debouncer.note_change();

            if self.guard.is_suppressed() {
                continue;
            }

            // Detection applies only to plain runs directly under the root,
            // never to text already inside a formatted element.
            if self.tree.parent(position.node) != Some(self.tree.root()) {
                continue;
            }

            if let Some(found) = detect(&updated, new_offset, c) {
                apply_transform(
                    &mut self.tree,
                    &mut self.caret,
                    &mut self.guard,
                    position.node,
                    &found,
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence Boundary
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the most recent document from the store, if one exists.
    ///
    /// Intended for session start. Store failures propagate to the caller;
    /// the editing surface stays usable either way.
    pub fn load_latest(&mut self, store: &dyn DocumentStore) -> Result<bool> {
        match store.load_latest()? {
            Some(content) => {
                self.set_markdown(&content)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flush pending changes to the store once the quiet period has passed.
    ///
    /// Returns `Ok(true)` when a save actually happened. On store failure
    /// the dirty flag stays set, so the next quiet period retries naturally.
    pub fn poll_save(&mut self, store: &dyn DocumentStore) -> Result<bool> {
        if !self.dirty || !self.debouncer.is_ready() {
            return Ok(false);
        }

        store.save(&self.get_markdown())?;
        self.dirty = false;
        self.debouncer.acknowledge();
        Ok(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementKind;

    fn session() -> EditorSession {
        // Zero settle window keeps tests deterministic without sleeping
        let settings = Settings {
            settle_window_ms: 10,
            ..Settings::default()
        };
        let mut session = EditorSession::with_settings(settings);
        session.focus();
        session
    }

    fn type_str(session: &mut EditorSession, text: &str) {
        for c in text.chars() {
            session.insert_text(&c.to_string());
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block Trigger Flow
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_typing_heading_prefix_creates_empty_heading() {
        let mut session = session();
        type_str(&mut session, "## ");

        let children = session.tree().children(session.tree().root());
        assert_eq!(children.len(), 1);
        assert_eq!(
            session.tree().element_kind(children[0]),
            Some(&ElementKind::Heading(2))
        );
        assert_eq!(session.tree().text_content(children[0]), "");
        // Caret landed inside the heading
        let caret = session.caret().unwrap();
        assert_eq!(Some(caret.node), session.tree().first_child(children[0]));
    }

    #[test]
    fn test_typing_continues_inside_new_heading() {
        let mut session = session();
        type_str(&mut session, "# ");
        // Wait out the settle window, then keep typing
        std::thread::sleep(Duration::from_millis(20));
        type_str(&mut session, "Hello");

        let heading = session.tree().children(session.tree().root())[0];
        assert_eq!(session.tree().text_content(heading), "Hello");
    }

    #[test]
    fn test_prefix_with_remainder_converts_whole_line() {
        // The run already holds "> quoted line" (arranged by earlier edits);
        // a space typed at the end of it completes the trigger with the
        // remainder as content.
        let mut session = session();
        let run = session.tree().last_text_run().unwrap();
        session.tree.set_text(run, "> quoted line");
        session.set_caret(run, "> quoted line".len());
        session.insert_text(" ");

        let quote = session.tree().children(session.tree().root())[0];
        assert_eq!(
            session.tree().element_kind(quote),
            Some(&ElementKind::Blockquote)
        );
        assert_eq!(session.tree().text_content(quote), "quoted line");
    }

    #[test]
    fn test_leftover_text_after_caret_is_preserved() {
        let mut session = session();
        let run = session.tree().last_text_run().unwrap();
        session.tree.set_text(run, "# Title extra");

        // Caret right after "Title", then a space completes the trigger
        session.set_caret(run, "# Title".len());
        session.insert_text(" ");

        let children = session.tree().children(session.tree().root());
        assert_eq!(children.len(), 2);
        assert_eq!(session.tree().text_content(children[0]), "Title");
        assert_eq!(session.tree().text_of(children[1]), Some(" extra"));
    }

    #[test]
    fn test_bullet_list_flow() {
        let mut session = session();
        type_str(&mut session, "- ");
        std::thread::sleep(Duration::from_millis(20));
        type_str(&mut session, "milk");

        let list = session.tree().children(session.tree().root())[0];
        assert_eq!(session.tree().element_kind(list), Some(&ElementKind::List));
        let item = session.tree().first_child(list).unwrap();
        assert_eq!(
            session.tree().element_kind(item),
            Some(&ElementKind::ListItem)
        );
        assert_eq!(session.tree().text_content(item), "milk");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Trigger Flow
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_typing_bold_character_by_character() {
        let mut session = session();
        type_str(&mut session, "**bold**");

        let children = session.tree().children(session.tree().root());
        let strong = children
            .iter()
            .find(|id| session.tree().element_kind(**id) == Some(&ElementKind::Strong))
            .copied()
            .expect("a strong element should exist");
        assert_eq!(session.tree().text_content(strong), "bold");
        // No residual delimiters anywhere
        assert!(!session
            .tree()
            .text_content(session.tree().root())
            .contains('*'));
    }

    #[test]
    fn test_typing_continues_after_inline_element() {
        let mut session = session();
        type_str(&mut session, "`ls`");
        std::thread::sleep(Duration::from_millis(20));
        type_str(&mut session, " runs");

        assert_eq!(
            session.tree().text_content(session.tree().root()),
            "ls runs"
        );
        let children = session.tree().children(session.tree().root());
        assert_eq!(
            session.tree().element_kind(children[0]),
            Some(&ElementKind::CodeSpan)
        );
        assert_eq!(session.tree().text_of(children[1]), Some(" runs"));
    }

    #[test]
    fn test_no_detection_inside_existing_element() {
        let mut session = session();
        type_str(&mut session, "> ");
        std::thread::sleep(Duration::from_millis(20));
        // A heading trigger typed inside the blockquote stays literal
        type_str(&mut session, "# ");

        let children = session.tree().children(session.tree().root());
        assert_eq!(children.len(), 1);
        assert_eq!(
            session.tree().element_kind(children[0]),
            Some(&ElementKind::Blockquote)
        );
        assert_eq!(session.tree().text_content(children[0]), "# ");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Re-entrancy
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_settle_window_suppresses_immediate_retrigger() {
        let settings = Settings {
            settle_window_ms: 500,
            ..Settings::default()
        };
        let mut session = EditorSession::with_settings(settings);
        session.focus();
        type_str(&mut session, "*a*");

        // The italic transform armed the guard; this second pair lands
        // inside the settle window and must stay plain text.
        type_str(&mut session, "*b*");

        let emphasis_count = session
            .tree()
            .children(session.tree().root())
            .iter()
            .filter(|id| session.tree().element_kind(**id) == Some(&ElementKind::Emphasis))
            .count();
        assert_eq!(emphasis_count, 1);
        assert!(session
            .tree()
            .text_content(session.tree().root())
            .contains("*b*"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_without_focus_is_noop() {
        let settings = Settings::default();
        let mut session = EditorSession::with_settings(settings);
        session.insert_text("hello");
        assert!(session.tree().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_clear_resets_tree_and_caret() {
        let mut session = session();
        type_str(&mut session, "# Title ");
        session.clear();

        assert!(session.tree().is_empty());
        assert!(session.caret().is_none());
        assert!(session.is_dirty());
    }

    #[test]
    fn test_focus_after_clear_restores_typing() {
        let mut session = session();
        session.clear();
        session.focus();
        session.insert_text("ok");
        assert_eq!(
            session.tree().text_content(session.tree().root()),
            "ok"
        );
    }

    #[test]
    fn test_typing_marks_dirty() {
        let mut session = session();
        assert!(!session.is_dirty());
        session.insert_text("x");
        assert!(session.is_dirty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content Exchange
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_and_get_markdown_round_trip() {
        let mut session = session();
        let markdown = "# Notes\n\nSome **bold** and *italic* and `code`.\n\n- one\n- two\n\n> quoted\n";
        session.set_markdown(markdown).unwrap();
        assert_eq!(session.get_markdown(), markdown);
        assert!(!session.is_dirty());
        assert!(session.caret().is_none());
    }

    #[test]
    fn test_get_html_covers_element_set() {
        let mut session = session();
        session
            .set_markdown("# Title\n\nSome **bold** text.\n\n- item\n\n> quote\n")
            .unwrap();
        let html = session.get_html();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<li>item</li>"));
        assert!(html.contains("<blockquote>quote</blockquote>"));
    }

    #[test]
    fn test_live_typed_content_serializes() {
        let mut session = session();
        type_str(&mut session, "**bold**");
        assert_eq!(session.get_markdown(), "**bold**\n");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence Boundary
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_poll_save_waits_for_quiet_period() {
        let settings = Settings {
            save_quiet_period_ms: 100,
            ..Settings::default()
        };
        let mut session = EditorSession::with_settings(settings);
        session.focus();
        session.insert_text("hi");

        let store = crate::persistence::MemoryStore::new();
        // Too early: the quiet period has not elapsed yet
        assert!(!session.poll_save(&store).unwrap());
        assert!(session.is_dirty());

        std::thread::sleep(Duration::from_millis(120));
        assert!(session.poll_save(&store).unwrap());
        assert!(!session.is_dirty());
        assert_eq!(store.load_latest().unwrap().as_deref(), Some("hi\n"));

        // Nothing further pending
        assert!(!session.poll_save(&store).unwrap());
    }

    #[test]
    fn test_load_latest_replaces_content() {
        let store = crate::persistence::MemoryStore::new();
        store.save("# Restored\n").unwrap();

        let mut session = session();
        assert!(session.load_latest(&store).unwrap());
        assert_eq!(session.get_markdown(), "# Restored\n");

        let empty_store = crate::persistence::MemoryStore::new();
        assert!(!session.load_latest(&empty_store).unwrap());
    }
}
