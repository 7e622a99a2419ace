//! Markdown trigger detection
//!
//! The detector inspects the text surrounding the caret after each character
//! insertion and classifies it against a fixed set of Markdown trigger
//! patterns. It is stateless per call: it reads only the current text run
//! and caret offset, and returns at most one match.
//!
//! Block-level triggers (heading, bullet list, blockquote) fire only on the
//! space character completing the prefix, must be anchored at the start of
//! the run, and inspect only the text before the caret. Inline triggers
//! (bold, italic, inline code) fire on any character insertion and scan the
//! whole run for the first delimiter pair. Both families are checked in a
//! fixed precedence order and the first match short-circuits the rest.

use crate::string_utils::floor_char_boundary;
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Trigger Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of Markdown trigger that was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// `#`-prefixed heading with level 1-6
    Heading { level: u8 },
    /// `-`/`*`/`+`-prefixed unordered list
    BulletList,
    /// `>`-prefixed blockquote
    Blockquote,
    /// `**bold**` or `__bold__`
    Bold,
    /// `*italic*` or `_italic_`
    Italic,
    /// `` `code` ``
    InlineCode,
}

impl TriggerKind {
    /// Whether this trigger converts a whole line into a container element.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            TriggerKind::Heading { .. } | TriggerKind::BulletList | TriggerKind::Blockquote
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trigger Match
// ─────────────────────────────────────────────────────────────────────────────

/// An ephemeral description of a detected trigger, consumed immediately by
/// the structural rewriter and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// What was detected
    pub kind: TriggerKind,
    /// Captured content, with trigger/delimiter characters excluded
    pub content: String,
    /// Leftover text preceding the matched trigger (empty for block triggers)
    pub before: String,
    /// Leftover text following the matched trigger
    pub after: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Cache
// ─────────────────────────────────────────────────────────────────────────────

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})(?:[ \t]+(.*))?$").expect("valid heading pattern"))
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([-*+])[ \t]*(.*)$").expect("valid bullet pattern"))
}

fn blockquote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^>[ \t]*(.*)$").expect("valid blockquote pattern"))
}

fn bold_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold pattern"))
}

fn bold_under_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__([^_]+)__").expect("valid bold pattern"))
}

fn italic_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").expect("valid italic pattern"))
}

fn italic_under_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_([^_]+)_").expect("valid italic pattern"))
}

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("valid code pattern"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Classify the text around the caret after inserting `inserted`.
///
/// `text` is the full content of the text run holding the caret and
/// `caret_offset` the byte position just after the insertion. Returns at
/// most one match; `None` means "no trigger found", which is not an error.
pub fn detect(text: &str, caret_offset: usize, inserted: char) -> Option<TriggerMatch> {
    let offset = floor_char_boundary(text, caret_offset);

    if inserted == ' ' {
        if let Some(found) = detect_block(text, offset) {
            return Some(found);
        }
    }

    detect_inline(text)
}

/// Block-level detection: heading, then bullet list, then blockquote.
///
/// Only the text before the caret is inspected; the space the user just
/// typed completes the trigger and is not part of the captured content.
/// Text after the caret becomes leftover `after` text.
fn detect_block(text: &str, offset: usize) -> Option<TriggerMatch> {
    let (before_caret, after_caret) = text.split_at(offset);
    let line = before_caret.strip_suffix(' ')?;

    if let Some(caps) = heading_re().captures(line) {
        let level = caps[1].len() as u8;
        let content = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        return Some(TriggerMatch {
            kind: TriggerKind::Heading { level },
            content: content.to_string(),
            before: String::new(),
            after: after_caret.to_string(),
        });
    }

    if let Some(caps) = bullet_re().captures(line) {
        return Some(TriggerMatch {
            kind: TriggerKind::BulletList,
            content: caps[2].to_string(),
            before: String::new(),
            after: after_caret.to_string(),
        });
    }

    if let Some(caps) = blockquote_re().captures(line) {
        return Some(TriggerMatch {
            kind: TriggerKind::Blockquote,
            content: caps[1].to_string(),
            before: String::new(),
            after: after_caret.to_string(),
        });
    }

    None
}

/// Inline detection: bold, then italic, then inline code.
///
/// The whole run is scanned and only the first occurrence of the winning
/// kind is returned; any remaining pairs are left for a later insertion
/// event to pick up.
fn detect_inline(text: &str) -> Option<TriggerMatch> {
    if let Some(found) = first_pair(text, &[bold_star_re(), bold_under_re()], TriggerKind::Bold) {
        return Some(found);
    }

    if let Some(found) = first_italic(text) {
        return Some(found);
    }

    first_pair(text, &[code_re()], TriggerKind::InlineCode)
}

/// First match of any of `patterns` in the run, earliest start wins.
fn first_pair(text: &str, patterns: &[&Regex], kind: TriggerKind) -> Option<TriggerMatch> {
    patterns
        .iter()
        .filter_map(|re| re.captures(text))
        .min_by_key(|caps| caps.get(0).map(|m| m.start()).unwrap_or(usize::MAX))
        .map(|caps| {
            let whole = caps.get(0).expect("match always has a full capture");
            TriggerMatch {
                kind,
                content: caps[1].to_string(),
                before: text[..whole.start()].to_string(),
                after: text[whole.end()..].to_string(),
            }
        })
}

/// First italic pair, rejecting candidates adjacent to another delimiter of
/// the same character (those belong to a bold pair still being typed).
fn first_italic(text: &str) -> Option<TriggerMatch> {
    let star = italic_candidate(text, italic_star_re(), b'*');
    let under = italic_candidate(text, italic_under_re(), b'_');

    let (start, end, content) = match (star, under) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };

    Some(TriggerMatch {
        kind: TriggerKind::Italic,
        content,
        before: text[..start].to_string(),
        after: text[end..].to_string(),
    })
}

/// First non-adjacent match of one italic delimiter, as (start, end, content).
fn italic_candidate(text: &str, re: &Regex, delim: u8) -> Option<(usize, usize, String)> {
    let bytes = text.as_bytes();
    for caps in re.captures_iter(text) {
        let whole = caps.get(0).expect("match always has a full capture");
        let prev_clear = whole.start() == 0 || bytes[whole.start() - 1] != delim;
        let next_clear = whole.end() >= bytes.len() || bytes[whole.end()] != delim;
        if prev_clear && next_clear {
            return Some((whole.start(), whole.end(), caps[1].to_string()));
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
