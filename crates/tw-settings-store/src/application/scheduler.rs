//! Save debouncing.
//!
//! Flash has limited write endurance, so settings changes are not written on
//! every mutation.  A save request is a synchronous gate: it either runs the
//! commit now or reports [`SaveOutcome::Debounced`] without touching
//! storage.
//!
//! ```text
//!   request_save(force)
//!        │
//!        ├── force, or no commit yet, or interval elapsed ──► commit()
//!        │                                                     │
//!        │                                   Ok ──► cursor = now, Committed
//!        │                                   Err ─► cursor kept, Failed
//!        │
//!        └── otherwise ──────────────────────────────────────► Debounced
//! ```
//!
//! A failed commit leaves the cursor alone, so the next request retries as
//! soon as it would have been allowed anyway.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

/// Monotonic time source.
///
/// Only differences between readings matter, so implementations report the
/// time elapsed since an arbitrary fixed origin.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send {
    /// Time since this clock's origin.  Never decreases.
    fn now(&self) -> Duration;
}

/// Result of one save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The settings were durably written.
    Committed,
    /// Too soon after the last commit; storage was not touched.
    Debounced,
    /// The commit was attempted and failed.
    Failed(String),
}

/// When the last successful commit happened and how far apart commits must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveCursor {
    last_commit: Option<Duration>,
    min_interval: Duration,
}

impl SaveCursor {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_commit: None,
            min_interval,
        }
    }

    pub fn last_commit(&self) -> Option<Duration> {
        self.last_commit
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Whether a non-forced save at `now` may write: strictly more than
    /// `min_interval` must have passed since the last commit.
    pub fn is_due(&self, now: Duration) -> bool {
        match self.last_commit {
            None => true,
            Some(last) => now.saturating_sub(last) > self.min_interval,
        }
    }

    /// Time left until a non-forced save is due.
    pub fn remaining(&self, now: Duration) -> Duration {
        match self.last_commit {
            None => Duration::ZERO,
            Some(last) => self.min_interval.saturating_sub(now.saturating_sub(last)),
        }
    }

    pub fn record(&mut self, now: Duration) {
        self.last_commit = Some(now);
    }
}

pub struct SaveScheduler {
    clock: Box<dyn Clock>,
    cursor: SaveCursor,
}

impl SaveScheduler {
    pub fn new(clock: Box<dyn Clock>, min_interval: Duration) -> Self {
        Self {
            clock,
            cursor: SaveCursor::new(min_interval),
        }
    }

    pub fn cursor(&self) -> &SaveCursor {
        &self.cursor
    }

    /// Runs `commit` if `force` is set or the minimum interval has passed
    /// since the last successful commit.
    pub fn request_save<E, F>(&mut self, force: bool, commit: F) -> SaveOutcome
    where
        E: fmt::Display,
        F: FnOnce() -> Result<(), E>,
    {
        let now = self.clock.now();
        if !force && !self.cursor.is_due(now) {
            debug!(
                remaining_ms = self.cursor.remaining(now).as_millis() as u64,
                "save debounced"
            );
            return SaveOutcome::Debounced;
        }

        match commit() {
            Ok(()) => {
                self.cursor.record(now);
                SaveOutcome::Committed
            }
            Err(e) => {
                warn!(force, error = %e, "save failed; will retry on next request");
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Marks a commit made outside [`request_save`](Self::request_save),
    /// such as the re-commit of a recovered backup.
    pub fn record_commit(&mut self) {
        let now = self.clock.now();
        self.cursor.record(now);
    }
}
