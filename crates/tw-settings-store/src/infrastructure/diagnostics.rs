//! Best-effort operational diagnostics.
//!
//! Two sinks receive short messages about notable load and save events:
//!
//! - an append-only text log at the mount point, one line per event;
//! - an optional small key-value store ([`DiagnosticKv`]) that keeps only
//!   the most recent failure under the keys `load` and `save`.
//!
//! Neither sink is covered by the store's durability guarantees.  A failure
//! to write either one is logged through `tracing` and otherwise ignored.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::infrastructure::storage::Filesystem;

/// Once the log grows past this many bytes it is started afresh.
pub const LOG_SIZE_LIMIT: u64 = 16 * 1024;

/// Key under which the last load failure is kept.
pub const LOAD_KEY: &str = "load";
/// Key under which the last save failure is kept.
pub const SAVE_KEY: &str = "save";

/// Small durable key-value capability used for diagnostic entries only.
pub trait DiagnosticKv: Send {
    fn put(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory [`DiagnosticKv`].  Clones share entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl DiagnosticKv for MemoryKv {
    fn put(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Which operation a diagnostic event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Save,
}

impl Operation {
    fn key(self) -> &'static str {
        match self {
            Operation::Load => LOAD_KEY,
            Operation::Save => SAVE_KEY,
        }
    }
}

pub struct Diagnostics {
    log_file: String,
    kv: Option<Box<dyn DiagnosticKv>>,
}

impl Diagnostics {
    pub fn new(log_file: impl Into<String>) -> Self {
        Self {
            log_file: log_file.into(),
            kv: None,
        }
    }

    pub fn set_kv(&mut self, kv: Box<dyn DiagnosticKv>) {
        self.kv = Some(kv);
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    /// Appends one line to the log file.
    pub fn note(&self, fs: &dyn Filesystem, op: Operation, message: &str) {
        if fs.size(&self.log_file).is_ok_and(|size| size > LOG_SIZE_LIMIT) {
            if let Err(e) = fs.remove(&self.log_file) {
                warn!(log = %self.log_file, error = %e, "could not reset diagnostic log");
            }
        }
        let line = format!("{}: {message}\n", op.key());
        if let Err(e) = fs.append(&self.log_file, line.as_bytes()) {
            warn!(log = %self.log_file, error = %e, "could not append to diagnostic log");
        }
    }

    /// Logs a failure and records it as the latest one for `op`.
    pub fn failure(&mut self, fs: &dyn Filesystem, op: Operation, message: &str) {
        self.note(fs, op, message);
        if let Some(kv) = self.kv.as_mut() {
            if let Err(e) = kv.put(op.key(), message) {
                warn!(key = op.key(), error = %e, "could not record diagnostic entry");
            }
        }
    }
}
