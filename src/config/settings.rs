//! User settings for the editing core
//!
//! This module defines the `Settings` struct that holds the tunable knobs of
//! the editing session, with serde support for JSON persistence. Everything
//! has a sensible default so a missing or partial settings file never blocks
//! the editor from starting.

use crate::render::MarkdownOptions;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default settle window for the mutation guard, in milliseconds.
///
/// Long enough to absorb same-tick mutation echoes from a rewrite, short
/// enough not to swallow legitimate follow-up keystrokes.
pub const DEFAULT_SETTLE_WINDOW_MS: u64 = 40;

/// Default quiet period before a content change is flushed to the store.
pub const DEFAULT_SAVE_QUIET_PERIOD_MS: u64 = 750;

/// Bounds for the settle window; values outside are clamped on load.
const SETTLE_WINDOW_RANGE_MS: (u64, u64) = (10, 500);

/// Bounds for the save quiet period; values outside are clamped on load.
const SAVE_QUIET_PERIOD_RANGE_MS: (u64, u64) = (100, 10_000);

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All user-configurable options for an editor session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long rewriter-induced mutations suppress trigger detection (ms)
    pub settle_window_ms: u64,
    /// Quiet period with no input before a save notification fires (ms)
    pub save_quiet_period_ms: u64,
    /// syntect theme name used when exporting highlighted code blocks
    pub highlight_theme: String,
    /// Whether to prefer the dark highlight theme when the named one is missing
    pub dark_mode: bool,
    /// Markdown parsing and rendering options
    pub markdown: MarkdownOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            settle_window_ms: DEFAULT_SETTLE_WINDOW_MS,
            save_quiet_period_ms: DEFAULT_SAVE_QUIET_PERIOD_MS,
            highlight_theme: String::new(),
            dark_mode: true,
            markdown: MarkdownOptions::default(),
        }
    }
}

impl Settings {
    /// Clamp loaded values into their supported ranges.
    ///
    /// Hand-edited settings files can carry arbitrary numbers; clamping on
    /// load keeps a typo from turning the settle window into a multi-second
    /// input freeze.
    pub fn validate(mut self) -> Self {
        let (lo, hi) = SETTLE_WINDOW_RANGE_MS;
        self.settle_window_ms = self.settle_window_ms.clamp(lo, hi);
        let (lo, hi) = SAVE_QUIET_PERIOD_RANGE_MS;
        self.save_quiet_period_ms = self.save_quiet_period_ms.clamp(lo, hi);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
