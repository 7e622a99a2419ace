//! Syntax highlighting for fenced code blocks
//!
//! This module wraps syntect for the HTML export path. Syntax and theme
//! sets are expensive to load, so one highlighter instance is cached behind
//! a `OnceLock` and reused for every export. Language tags are resolved
//! through an alias table, then by extension and name, and finally by
//! first-line detection; when nothing matches, or highlighting itself
//! fails, the caller degrades to unhighlighted text.

use crate::config::Settings;
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default dark theme name from syntect's built-in themes
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

/// Default light theme name from syntect's built-in themes
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

/// Fallback theme if the specified theme is not found
pub const FALLBACK_THEME: &str = "base16-ocean.dark";

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax highlighter that caches syntect sets for reuse.
pub struct SyntaxHighlighter {
    /// Loaded syntax definitions
    syntax_set: SyntaxSet,
    /// Loaded color themes
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Create a new highlighter with syntect's bundled syntaxes and themes.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Get a theme by name, falling back to the default if not found.
    pub fn get_theme(&self, name: &str) -> &Theme {
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
            .expect("fallback theme ships with syntect")
    }

    /// Get the appropriate theme for dark or light mode.
    pub fn get_theme_for_mode(&self, dark_mode: bool) -> &Theme {
        let theme_name = if dark_mode {
            DEFAULT_DARK_THEME
        } else {
            DEFAULT_LIGHT_THEME
        };
        self.get_theme(theme_name)
    }

    /// Get a theme by name from settings, with mode-based fallback.
    pub fn get_theme_by_name_or_mode(&self, theme_name: &str, dark_mode: bool) -> &Theme {
        if self.theme_set.themes.contains_key(theme_name) {
            self.get_theme(theme_name)
        } else {
            self.get_theme_for_mode(dark_mode)
        }
    }

    /// Highlight a code block to HTML markup.
    ///
    /// Returns `None` when no syntax matches the language (and first-line
    /// detection finds nothing either) or when highlighting fails; the
    /// caller renders plain escaped code instead.
    pub fn highlight_to_html(
        &self,
        code: &str,
        language: &str,
        settings: &Settings,
    ) -> Option<String> {
        let syntax = self.find_syntax(code, language)?;
        let theme = self.get_theme_by_name_or_mode(&settings.highlight_theme, settings.dark_mode);

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(markup) => Some(markup),
            Err(e) => {
                warn!("Failed to highlight {} code block: {}", language, e);
                None
            }
        }
    }

    /// Find a syntax definition for a language tag.
    ///
    /// Tries, in order: common alias mapping to an extension, lookup by
    /// name, case-insensitive name search, and finally automatic detection
    /// from the first line of the code itself.
    fn find_syntax(&self, code: &str, language: &str) -> Option<&SyntaxReference> {
        if !language.is_empty() {
            let lang_lower = language.to_lowercase();

            let extension = match lang_lower.as_str() {
                "rust" | "rs" => "rs",
                "python" | "py" => "py",
                "javascript" | "js" => "js",
                "typescript" | "ts" => "ts",
                "c" => "c",
                "cpp" | "c++" | "cxx" => "cpp",
                "csharp" | "c#" | "cs" => "cs",
                "java" => "java",
                "go" | "golang" => "go",
                "ruby" | "rb" => "rb",
                "php" => "php",
                "html" | "htm" => "html",
                "css" => "css",
                "json" => "json",
                "yaml" | "yml" => "yaml",
                "toml" => "toml",
                "xml" => "xml",
                "markdown" | "md" => "md",
                "sql" => "sql",
                "shell" | "sh" | "bash" | "zsh" => "sh",
                "makefile" | "make" => "Makefile",
                "lua" => "lua",
                "diff" | "patch" => "diff",
                other => other,
            };

            if let Some(syntax) = self.syntax_set.find_syntax_by_extension(extension) {
                return Some(syntax);
            }

            if let Some(syntax) = self.syntax_set.find_syntax_by_name(language) {
                return Some(syntax);
            }

            if let Some(syntax) = self
                .syntax_set
                .syntaxes()
                .iter()
                .find(|syntax| syntax.name.to_lowercase() == lang_lower)
            {
                return Some(syntax);
            }

            debug!("No syntax found for language tag: {}", language);
        }

        // Automatic detection from the code itself
        self.syntax_set
            .find_syntax_by_first_line(code.lines().next().unwrap_or(""))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

/// Global highlighter, lazily initialized on first access.
static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_highlights() {
        let markup = get_highlighter()
            .highlight_to_html("fn main() {}\n", "rust", &Settings::default())
            .expect("rust should highlight");
        assert!(markup.contains("<pre"));
        assert!(markup.contains("main"));
    }

    #[test]
    fn test_language_alias_resolves() {
        let highlighter = get_highlighter();
        assert!(highlighter.find_syntax("", "golang").is_some());
        assert!(highlighter.find_syntax("", "Python").is_some());
    }

    #[test]
    fn test_unknown_language_falls_back_to_first_line() {
        let highlighter = get_highlighter();
        // A shebang identifies the code even with a bogus language tag
        let syntax = highlighter.find_syntax("#!/usr/bin/env bash\necho hi\n", "nosuchlang");
        assert!(syntax.is_some());
    }

    #[test]
    fn test_totally_unrecognizable_code_is_none() {
        let highlighter = get_highlighter();
        assert!(highlighter
            .find_syntax("plain words, nothing else\n", "nosuchlang")
            .is_none());
    }

    #[test]
    fn test_unknown_theme_falls_back_by_mode() {
        let highlighter = get_highlighter();
        let theme = highlighter.get_theme_by_name_or_mode("no-such-theme", true);
        // The fallback is a real theme with settings populated
        assert!(theme.settings.background.is_some());
    }
}
