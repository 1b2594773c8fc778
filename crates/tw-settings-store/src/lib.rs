//! # tw-settings-store
//!
//! Crash-safe persistence for the TinyWATCH settings.
//!
//! [`Store`] owns the in-memory [`Config`](tw_settings_core::Config) and
//! keeps it on flash:
//!
//! - every commit goes through a staging file and an atomic rename, so a
//!   power cut never leaves a half-written primary;
//! - each commit first copies the superseded primary into a bounded,
//!   numbered backup set, which `load` falls back on when the primary is
//!   corrupt;
//! - non-forced saves are debounced to spare flash write cycles.
//!
//! # Layers
//!
//! - **`application`**    – the save debounce and the status records.
//! - **`infrastructure`** – filesystems, the durable writer, the backup
//!   rotator, clocks, diagnostics, and the TOML deployment config.
//! - **`store`**          – the façade that composes them.

pub mod application;
pub mod infrastructure;
pub mod store;

pub use application::scheduler::{Clock, SaveCursor, SaveOutcome, SaveScheduler};
pub use application::status::{StatusKind, StatusRecord, StatusReporter};
pub use infrastructure::clock::{ManualClock, SystemClock};
pub use infrastructure::diagnostics::{DiagnosticKv, MemoryKv};
pub use infrastructure::storage::{
    load_store_config, parse_ordinal, save_store_config, BackupError, BackupRotator, DiskFs,
    DurableWriter, Fault, Filesystem, MemoryFs, ReadError, StoreConfig, StoreConfigError,
    WriteError,
};
pub use store::{BackupOutcome, LoadOutcome, Store};
