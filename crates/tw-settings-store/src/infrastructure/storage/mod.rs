//! Storage infrastructure: the filesystem capability and everything that
//! writes settings artifacts through it.
//!
//! - **`disk`**    – [`DiskFs`], the real filesystem rooted at a mount point.
//! - **`memory`**  – [`MemoryFs`], an in-memory double with fault injection
//!   for crash and failure tests.
//! - **`durable`** – stage-then-rename commits and primary reads.
//! - **`backup`**  – the bounded, ordinal-numbered backup set.
//! - **`config`**  – the TOML deployment configuration of the store itself.
//!
//! # Logical names
//!
//! Every operation takes a bare file name relative to the mount point
//! (`"settings.json"`).  The store keeps all of its artifacts in one flat
//! directory so that a rename between them never crosses a directory and
//! stays atomic.

use std::io;

pub mod backup;
pub mod config;
pub mod disk;
pub mod durable;
pub mod memory;

pub use backup::{parse_ordinal, BackupError, BackupRotator};
pub use config::{load_store_config, save_store_config, StoreConfig, StoreConfigError};
pub use disk::DiskFs;
pub use durable::{DurableWriter, ReadError, WriteError};
pub use memory::{Fault, MemoryFs};

/// Filesystem operations the store needs from the flash driver.
///
/// Implementations must make [`rename`](Filesystem::rename) an atomic
/// replace: after a crash, `to` holds either its old or its new content.
pub trait Filesystem: Send {
    /// Reads a whole file.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Creates or truncates `name`, writes `data`, and flushes it to storage.
    fn write(&self, name: &str, data: &[u8]) -> io::Result<()>;

    /// Appends `data` to `name`, creating it if needed.
    fn append(&self, name: &str, data: &[u8]) -> io::Result<()>;

    /// Size in bytes of `name` as stored.
    fn size(&self, name: &str) -> io::Result<u64>;

    /// Atomically replaces `to` with `from`.
    fn rename(&self, from: &str, to: &str) -> io::Result<()>;

    fn remove(&self, name: &str) -> io::Result<()>;

    /// Names of all files at the mount point.
    fn list(&self) -> io::Result<Vec<String>>;

    fn exists(&self, name: &str) -> bool {
        self.size(name).is_ok()
    }
}
