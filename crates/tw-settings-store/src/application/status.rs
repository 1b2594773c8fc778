//! Last-operation outcomes for operator-facing surfaces.
//!
//! The store overwrites one [`StatusRecord`] per operation (load and save)
//! every time that operation finishes.  Callers only ever read them.

use std::fmt;

/// Enumerated result of the most recent load or save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The operation has not run yet.
    Pending,
    Success,
    /// No settings existed; defaults were written.
    Created,
    Debounced,
    /// The primary was unusable and a backup was adopted.
    RecoveredFromBackup,
    /// Neither the primary nor any backup was usable; defaults were adopted.
    Defaulted,
    /// The primary exists but could not be read; defaults are held in memory
    /// and nothing was written.
    ReadFailed,
    WriteFailed,
}

impl StatusKind {
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Pending => "pending",
            StatusKind::Success => "success",
            StatusKind::Created => "created defaults",
            StatusKind::Debounced => "debounced",
            StatusKind::RecoveredFromBackup => "recovered from backup",
            StatusKind::Defaulted => "decode failed, defaulted",
            StatusKind::ReadFailed => "read failed",
            StatusKind::WriteFailed => "write failed",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub kind: StatusKind,
    pub detail: String,
}

impl StatusRecord {
    pub fn new(kind: StatusKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self::new(StatusKind::Pending, "")
    }
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.detail)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusReporter {
    load: StatusRecord,
    save: StatusRecord,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_load(&mut self, kind: StatusKind, detail: impl Into<String>) {
        self.load = StatusRecord::new(kind, detail);
    }

    pub fn record_save(&mut self, kind: StatusKind, detail: impl Into<String>) {
        self.save = StatusRecord::new(kind, detail);
    }

    pub fn load(&self) -> &StatusRecord {
        &self.load
    }

    pub fn save(&self) -> &StatusRecord {
        &self.save
    }

    pub fn load_status(&self) -> String {
        self.load.to_string()
    }

    pub fn save_status(&self) -> String {
        self.save.to_string()
    }
}
