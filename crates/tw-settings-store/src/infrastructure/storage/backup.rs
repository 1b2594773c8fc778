//! Bounded, numbered history of committed settings artifacts.
//!
//! Backups are named `<prefix><ordinal>` in the mount directory, e.g.
//! `settings_back_7`.  A new backup always takes one more than the highest
//! ordinal present, so "most recent" is simply the largest number.  After
//! each snapshot the lowest ordinals are deleted until at most
//! `max_backups` remain.
//!
//! [`BackupRotator::copy`], [`prune`](BackupRotator::prune) and
//! [`discard`](BackupRotator::discard) split a snapshot in two so a caller
//! can drop the copy again when the write it was protecting fails.

use std::io;

use thiserror::Error;
use tracing::{debug, info, warn};
use tw_settings_core::Config;

use super::durable::{DurableWriter, ReadError, WriteError};
use super::Filesystem;

/// Error type for backup operations.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("failed to list backups: {0}")]
    List(#[source] io::Error),

    #[error("failed to read artifact to back up: {0}")]
    Read(#[source] ReadError),

    #[error("failed to write backup: {0}")]
    Write(#[from] WriteError),

    /// The newest backup already carries the largest possible ordinal.
    #[error("no ordinal left after {0}")]
    OrdinalsExhausted(String),
}

/// Extracts the ordinal from a backup file name.
///
/// Returns `None` unless `name` is exactly `prefix` followed by one or more
/// ASCII digits that fit in a `u64`.  Anything else, such as a stray
/// `settings_back_` or `settings_back_3.tmp`, is not a backup.
pub fn parse_ordinal(prefix: &str, name: &str) -> Option<u64> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Maintains the backup set.
#[derive(Debug, Clone)]
pub struct BackupRotator {
    prefix: String,
    max_backups: usize,
}

impl BackupRotator {
    pub fn new(prefix: impl Into<String>, max_backups: usize) -> Self {
        Self {
            prefix: prefix.into(),
            max_backups,
        }
    }

    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    pub fn backup_name(&self, ordinal: u64) -> String {
        format!("{}{ordinal}", self.prefix)
    }

    /// Ordinals present on storage, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::List`] if the directory cannot be listed.
    pub fn list_ordinals(&self, fs: &dyn Filesystem) -> Result<Vec<u64>, BackupError> {
        let mut ordinals: Vec<u64> = fs
            .list()
            .map_err(BackupError::List)?
            .iter()
            .filter_map(|name| parse_ordinal(&self.prefix, name))
            .collect();
        ordinals.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ordinals)
    }

    /// Copies the current content of `source` into a new backup, then trims
    /// the set back to `max_backups`.
    ///
    /// Returns the new ordinal, or `None` if `source` does not exist yet or
    /// backups are disabled (`max_backups == 0`).
    ///
    /// # Errors
    ///
    /// See [`copy`](Self::copy).  A failure to delete an old backup is only
    /// logged.
    pub fn snapshot(
        &self,
        fs: &dyn Filesystem,
        writer: &DurableWriter,
        source: &str,
    ) -> Result<Option<u64>, BackupError> {
        let ordinal = self.copy(fs, writer, source)?;
        if ordinal.is_some() {
            self.prune(fs);
        }
        Ok(ordinal)
    }

    /// Copies `source` into a new backup without trimming the set.
    ///
    /// Pair with [`prune`](Self::prune) once the copy should count, or
    /// [`discard`](Self::discard) to take it back.
    ///
    /// # Errors
    ///
    /// Returns a [`BackupError`] if listing, reading, or writing fails, or
    /// [`BackupError::OrdinalsExhausted`] if the highest ordinal present is
    /// `u64::MAX`.
    pub fn copy(
        &self,
        fs: &dyn Filesystem,
        writer: &DurableWriter,
        source: &str,
    ) -> Result<Option<u64>, BackupError> {
        if self.max_backups == 0 {
            return Ok(None);
        }

        let data = match fs.read(source) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(source, "nothing to back up");
                return Ok(None);
            }
            Err(source_err) => {
                return Err(BackupError::Read(ReadError::Io {
                    name: source.to_string(),
                    source: source_err,
                }))
            }
        };

        let next = match self.list_ordinals(fs)?.first() {
            None => 0,
            Some(&max) => max
                .checked_add(1)
                .ok_or_else(|| BackupError::OrdinalsExhausted(self.backup_name(max)))?,
        };
        let name = self.backup_name(next);
        writer.commit_to(fs, &name, &data)?;
        info!(ordinal = next, name = %name, "created settings backup");
        Ok(Some(next))
    }

    /// Deletes the oldest backups beyond the bound.  Failures are logged.
    pub fn prune(&self, fs: &dyn Filesystem) {
        let ordinals = match self.list_ordinals(fs) {
            Ok(ordinals) => ordinals,
            Err(e) => {
                warn!(error = %e, "could not list backups to prune");
                return;
            }
        };
        for ordinal in ordinals.into_iter().skip(self.max_backups) {
            match fs.remove(&self.backup_name(ordinal)) {
                Ok(()) => debug!(ordinal, "pruned old backup"),
                Err(e) => warn!(ordinal, error = %e, "failed to prune old backup"),
            }
        }
    }

    /// Removes a backup made by [`copy`](Self::copy) that should not count.
    pub fn discard(&self, fs: &dyn Filesystem, ordinal: u64) {
        match fs.remove(&self.backup_name(ordinal)) {
            Ok(()) => debug!(ordinal, "discarded backup"),
            Err(e) => warn!(ordinal, error = %e, "could not discard backup"),
        }
    }

    /// Reads and decodes one backup.
    ///
    /// # Errors
    ///
    /// Any [`ReadError`] from the durable reader.
    pub fn load(
        &self,
        fs: &dyn Filesystem,
        writer: &DurableWriter,
        ordinal: u64,
    ) -> Result<Config, ReadError> {
        writer.load_from(fs, &self.backup_name(ordinal))
    }
}
