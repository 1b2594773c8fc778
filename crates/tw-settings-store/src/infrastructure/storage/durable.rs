//! Crash-safe artifact writes and primary reads.
//!
//! A commit never writes the target in place.  The full text goes to the
//! staging file first, its stored size is checked against what was written,
//! and only then is staging renamed over the target.  A power cut at any
//! point leaves the target holding either the old or the new artifact.
//!
//! The staging file is scratch space: it is never read back as settings.
//!
//! [`DurableWriter`] only answers "are these bytes durably stored" and "can
//! the primary be decoded".  Deciding what to do with a bad primary is up to
//! the caller.

use std::io;

use thiserror::Error;
use tracing::{debug, warn};
use tw_settings_core::{decode, Config, DecodeError, EncodeError};

use super::Filesystem;

/// Error type for commits.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to write staging file {name}: {source}")]
    Stage {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("staging file {name} holds {actual} of {expected} bytes")]
    ShortWrite {
        name: String,
        expected: u64,
        actual: u64,
    },

    #[error("failed to replace {target} with {staging}: {source}")]
    Commit {
        staging: String,
        target: String,
        #[source]
        source: io::Error,
    },
}

/// Error type for artifact reads.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{0} does not exist")]
    NotFound(String),

    #[error("I/O error reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{name} is not UTF-8 text")]
    NotText { name: String },

    #[error("{name} could not be decoded: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

impl ReadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReadError::NotFound(_))
    }
}

/// Stage-then-rename writer for the primary artifact and its backups.
#[derive(Debug, Clone)]
pub struct DurableWriter {
    primary: String,
    staging: String,
}

impl DurableWriter {
    pub fn new(primary: impl Into<String>, staging: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            staging: staging.into(),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn staging(&self) -> &str {
        &self.staging
    }

    /// Durably replaces the primary artifact with `text`.
    ///
    /// # Errors
    ///
    /// See [`commit_to`](Self::commit_to).
    pub fn commit(&self, fs: &dyn Filesystem, text: &str) -> Result<(), WriteError> {
        self.commit_to(fs, &self.primary, text.as_bytes())
    }

    /// Durably replaces `target` with `data`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Stage`] or [`WriteError::ShortWrite`] if the
    /// staging copy could not be written in full (the target is untouched),
    /// or [`WriteError::Commit`] if the final rename failed.
    pub fn commit_to(&self, fs: &dyn Filesystem, target: &str, data: &[u8]) -> Result<(), WriteError> {
        fs.write(&self.staging, data)
            .map_err(|source| WriteError::Stage {
                name: self.staging.clone(),
                source,
            })?;

        let expected = data.len() as u64;
        let actual = fs.size(&self.staging).map_err(|source| WriteError::Stage {
            name: self.staging.clone(),
            source,
        })?;
        if actual != expected {
            // A truncated staging file must never be renamed into place.
            let _ = fs.remove(&self.staging);
            return Err(WriteError::ShortWrite {
                name: self.staging.clone(),
                expected,
                actual,
            });
        }

        fs.rename(&self.staging, target)
            .map_err(|source| WriteError::Commit {
                staging: self.staging.clone(),
                target: target.to_string(),
                source,
            })?;

        debug!(target, bytes = expected, "committed artifact");
        Ok(())
    }

    /// Reads `name` as text.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::NotFound`] if the file is absent, otherwise
    /// [`ReadError::Io`] or [`ReadError::NotText`].
    pub fn read_text(&self, fs: &dyn Filesystem, name: &str) -> Result<String, ReadError> {
        let bytes = fs.read(name).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReadError::NotFound(name.to_string())
            } else {
                ReadError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })?;
        String::from_utf8(bytes).map_err(|_| ReadError::NotText {
            name: name.to_string(),
        })
    }

    /// Reads and decodes the artifact at `name`.
    ///
    /// # Errors
    ///
    /// Any [`ReadError`]; [`ReadError::Decode`] when the text is unusable.
    pub fn load_from(&self, fs: &dyn Filesystem, name: &str) -> Result<Config, ReadError> {
        let text = self.read_text(fs, name)?;
        decode(&text).map_err(|source| ReadError::Decode {
            name: name.to_string(),
            source,
        })
    }

    /// Reads and decodes the primary artifact.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load_primary(&self, fs: &dyn Filesystem) -> Result<Config, ReadError> {
        self.load_from(fs, &self.primary)
    }

    /// Deletes a staging file left behind by an interrupted commit.
    ///
    /// Returns `true` if one was found.
    pub fn discard_stale_staging(&self, fs: &dyn Filesystem) -> bool {
        if !fs.exists(&self.staging) {
            return false;
        }
        if let Err(e) = fs.remove(&self.staging) {
            warn!(name = %self.staging, error = %e, "could not remove stale staging file");
        }
        true
    }
}
