//! Search debounce (pure; the caller supplies the clock).
//!
//! A zero delay commits every keystroke immediately. Otherwise the latest
//! term is held until `delay` passes without another keystroke. Whatever the
//! delay, the last term typed is the one committed.

use std::time::{Duration, Instant};

/// Pending search term waiting for the input to settle.
#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebounce {
    /// Debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a keystroke. Returns the term to commit now when the delay is
    /// zero, otherwise holds it and returns `None`.
    pub fn schedule(&mut self, term: String, now: Instant) -> Option<String> {
        if self.delay.is_zero() {
            self.pending = None;
            return Some(term);
        }
        self.pending = Some((term, now + self.delay));
        None
    }

    /// Take the held term if its quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(term, _)| term),
            _ => None,
        }
    }

    /// Take the held term regardless of time (e.g. on Enter).
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(term, _)| term)
    }

    /// Drop the held term.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a term is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
