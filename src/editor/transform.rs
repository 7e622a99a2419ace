//! Structural rewriting of trigger matches
//!
//! Given a detected trigger, the rewriter performs the tree surgery: it
//! splits the affected text run into `before` / `content` / `after` slices,
//! constructs the target element populated with the content, splices it into
//! the run's position as one logical unit, and repositions the caret at a
//! deterministic anchor point.
//!
//! The five transform variants (heading, list, blockquote, bold/italic,
//! code) share one shape and differ only in the element they construct, so
//! they are unified behind a single tagged-variant dispatch instead of five
//! near-identical routines.

use crate::editor::caret::CursorAnchor;
use crate::editor::guard::MutationGuard;
use crate::editor::trigger::{TriggerKind, TriggerMatch};
use crate::tree::{ElementKind, VisualTree};
use indextree::NodeId;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Transform Application
// ─────────────────────────────────────────────────────────────────────────────

/// Rewrite `text_run` according to `found`.
///
/// Splice order: leftover `before` text (if any) goes ahead of the run's
/// position, then the new element, then leftover `after` text behind it,
/// and finally the original run is removed. The whole splice happens as one
/// logical unit under the mutation guard, so none of the intermediate
/// states is ever observed by trigger detection.
///
/// Once converted, the trigger text no longer exists in the tree, so
/// re-running detection on the same input cannot re-match it.
///
/// Returns `false` when nothing was rewritten. A run that has already been
/// detached by a concurrent mutation is a benign race, not an error: the
/// operation silently no-ops.
pub fn apply_transform<A: CursorAnchor>(
    tree: &mut VisualTree,
    anchor: &mut A,
    guard: &mut MutationGuard,
    text_run: NodeId,
    found: &TriggerMatch,
) -> bool {
    guard.begin();
    let performed = splice(tree, anchor, text_run, found);
    guard.release();
    performed
}

fn splice<A: CursorAnchor>(
    tree: &mut VisualTree,
    anchor: &mut A,
    text_run: NodeId,
    found: &TriggerMatch,
) -> bool {
    if tree.text_of(text_run).is_none() || tree.parent(text_run).is_none() {
        debug!("Transform target is detached or not a text run; skipping");
        return false;
    }

    let element = build_element(tree, found);

    // Splice as one logical unit: before-text, element, after-text, then
    // drop the original run.
    if !found.before.is_empty() {
        let before_run = tree.new_text(found.before.clone());
        tree.insert_before(text_run, before_run);
    }

    tree.insert_before(text_run, element);

    // Inline transforms always park a run after the element so the caret has
    // somewhere to land; block transforms only keep non-empty leftover text.
    if !found.after.is_empty() || !found.kind.is_block() {
        let after_run = tree.new_text(found.after.clone());
        tree.insert_after(element, after_run);
    }

    tree.remove(text_run);

    if found.kind.is_block() {
        anchor.place_at_content_end(tree, element);
    } else {
        anchor.place_after(tree, element);
    }

    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Element Construction
// ─────────────────────────────────────────────────────────────────────────────

/// Build the detached element for a trigger match, content text included.
///
/// Every element gets an inner text run even when the content is empty, so
/// caret anchoring always has a valid landing spot.
fn build_element(tree: &mut VisualTree, found: &TriggerMatch) -> NodeId {
    let content = tree.new_text(found.content.clone());

    match found.kind {
        TriggerKind::Heading { level } => {
            let heading = tree.new_element(ElementKind::Heading(level));
            tree.append_child(heading, content);
            heading
        }
        TriggerKind::BulletList => {
            let list = tree.new_element(ElementKind::List);
            let item = tree.new_element(ElementKind::ListItem);
            tree.append_child(item, content);
            tree.append_child(list, item);
            list
        }
        TriggerKind::Blockquote => {
            let quote = tree.new_element(ElementKind::Blockquote);
            tree.append_child(quote, content);
            quote
        }
        TriggerKind::Bold => {
            let strong = tree.new_element(ElementKind::Strong);
            tree.append_child(strong, content);
            strong
        }
        TriggerKind::Italic => {
            let emphasis = tree.new_element(ElementKind::Emphasis);
            tree.append_child(emphasis, content);
            emphasis
        }
        TriggerKind::InlineCode => {
            let code = tree.new_element(ElementKind::CodeSpan);
            tree.append_child(code, content);
            code
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
