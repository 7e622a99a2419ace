//! Re-entrancy guard for programmatic tree mutations
//!
//! When the structural rewriter splices new nodes into the visual tree, the
//! resulting insertion events must not be re-interpreted as user input, or a
//! transform could trigger itself in a cascade. The guard models this as an
//! explicit suppress state on the editor session: armed for the duration of
//! a rewrite, then held through a short settle window that absorbs any
//! same-tick mutation echoes before detection resumes.
//!
//! Everything is single-threaded and cooperative, so release is observed
//! lazily: `is_suppressed()` simply reports whether the window has elapsed.

use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Mutation Guard
// ─────────────────────────────────────────────────────────────────────────────

/// Suppresses trigger detection during and shortly after a rewrite.
#[derive(Debug)]
pub struct MutationGuard {
    /// Whether a rewrite is currently in progress
    rewriting: bool,
    /// When the last rewrite finished
    released_at: Option<Instant>,
    /// How long after release the suppression keeps holding
    settle_window: Duration,
}

impl MutationGuard {
    /// Create a guard with the given settle window.
    pub fn new(settle_window: Duration) -> Self {
        Self {
            rewriting: false,
            released_at: None,
            settle_window,
        }
    }

    /// Mark the start of a rewrite. Detection is suppressed until
    /// [`release`](Self::release) plus the settle window.
    pub fn begin(&mut self) {
        self.rewriting = true;
    }

    /// Mark the end of a rewrite, starting the settle window.
    pub fn release(&mut self) {
        self.rewriting = false;
        self.released_at = Some(Instant::now());
    }

    /// Whether insertion events should currently bypass trigger detection.
    pub fn is_suppressed(&self) -> bool {
        if self.rewriting {
            return true;
        }
        match self.released_at {
            Some(released) => released.elapsed() < self.settle_window,
            None => false,
        }
    }

    /// The configured settle window.
    pub fn settle_window(&self) -> Duration {
        self.settle_window
    }

    /// Change the settle window (applies from the next release).
    pub fn set_settle_window(&mut self, window: Duration) {
        self.settle_window = window;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_fresh_guard_is_open() {
        let guard = MutationGuard::new(Duration::from_millis(40));
        assert!(!guard.is_suppressed());
    }

    #[test]
    fn test_begin_suppresses() {
        let mut guard = MutationGuard::new(Duration::from_millis(40));
        guard.begin();
        assert!(guard.is_suppressed());
    }

    #[test]
    fn test_release_holds_through_settle_window() {
        let mut guard = MutationGuard::new(Duration::from_millis(50));
        guard.begin();
        guard.release();
        // Immediately after release the settle window is still holding
        assert!(guard.is_suppressed());
    }

    #[test]
    fn test_settle_window_elapses() {
        let mut guard = MutationGuard::new(Duration::from_millis(5));
        guard.begin();
        guard.release();
        sleep(Duration::from_millis(10));
        assert!(!guard.is_suppressed());
    }

    #[test]
    fn test_zero_window_releases_immediately() {
        let mut guard = MutationGuard::new(Duration::ZERO);
        guard.begin();
        guard.release();
        assert!(!guard.is_suppressed());
    }
}
