//! Quiescence debouncer for typed search text.
//!
//! Every input restarts the window. When the window elapses without further
//! input the latest text is committed exactly once. Commits are keyed on the
//! window, not on the value: typing `a`, waiting, then retyping `a` commits
//! `a` twice.
//!
//! The debouncer holds no timer of its own. The owning event loop asks for
//! [`Debouncer::deadline`] and sleeps until then, which keeps this type
//! synchronous and trivially testable with explicit instants.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
struct Pending {
    text: String,
    due: Instant,
}

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record new raw text observed at `now`, (re)starting the window.
    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            text: text.into(),
            due: now + self.window,
        });
    }

    /// When the pending text becomes committable, if anything is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the committed text if the window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.text),
            _ => None,
        }
    }

    /// Drop whatever is pending, returning it.
    pub fn cancel(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(800);

    #[test]
    fn test_commits_after_quiescence() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("batman", t0);
        assert_eq!(d.poll(t0 + Duration::from_millis(799)), None);
        assert_eq!(d.poll(t0 + WINDOW).as_deref(), Some("batman"));
        // Exactly once per window.
        assert_eq!(d.poll(t0 + WINDOW * 2), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_keystrokes_reset_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("b", t0);
        d.push("ba", t0 + Duration::from_millis(300));
        d.push("bat", t0 + Duration::from_millis(600));
        // 800ms after the first key, but only 200ms after the last one.
        assert_eq!(d.poll(t0 + WINDOW), None);
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(1400)));
        assert_eq!(
            d.poll(t0 + Duration::from_millis(1400)).as_deref(),
            Some("bat")
        );
    }

    #[test]
    fn test_same_text_in_separate_windows_commits_twice() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("a", t0);
        assert_eq!(d.poll(t0 + WINDOW).as_deref(), Some("a"));
        d.push("", t0 + WINDOW * 2);
        d.push("a", t0 + WINDOW * 2 + Duration::from_millis(100));
        assert_eq!(
            d.poll(t0 + WINDOW * 3 + Duration::from_millis(100)).as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_cancel_drops_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("x", t0);
        assert_eq!(d.cancel().as_deref(), Some("x"));
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(t0 + WINDOW), None);
    }
}
