//! TOML deployment configuration for the settings store.
//!
//! This is *not* the watch's settings schema; it describes where the store
//! lives and how it behaves:
//!
//! ```toml
//! [storage]
//! mount_point = "/flash"
//! max_backups = 10
//!
//! [save]
//! min_interval_secs = 30
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field carries `#[serde(default = "...")]`, so a partial file or no
//! file at all yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for deployment configuration files.
#[derive(Debug, Error)]
pub enum StoreConfigError {
    #[error("I/O error accessing store config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize store config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub save: SaveConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the artifacts live and what they are called.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory standing in for the flash mount point.
    #[serde(default = "default_mount_point")]
    pub mount_point: PathBuf,
    #[serde(default = "default_primary_file")]
    pub primary_file: String,
    /// Must differ from `primary_file` and live in the same directory.
    #[serde(default = "default_staging_file")]
    pub staging_file: String,
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,
    /// Append-only diagnostic log.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Upper bound on the backup set.  `0` disables backups.
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveConfig {
    /// Non-forced saves closer together than this are debounced.
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,
}

impl SaveConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_mount_point() -> PathBuf {
    PathBuf::from("./tinywatch-fs")
}
fn default_primary_file() -> String {
    "settings.json".to_string()
}
fn default_staging_file() -> String {
    "tmp_settings.json".to_string()
}
fn default_backup_prefix() -> String {
    "settings_back_".to_string()
}
fn default_log_file() -> String {
    "log.txt".to_string()
}
fn default_max_backups() -> usize {
    10
}
fn default_min_interval_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mount_point: default_mount_point(),
            primary_file: default_primary_file(),
            staging_file: default_staging_file(),
            backup_prefix: default_backup_prefix(),
            log_file: default_log_file(),
            max_backups: default_max_backups(),
        }
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads a [`StoreConfig`] from `path`, returning the defaults if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`StoreConfigError::Io`] for file-system errors other than "not
/// found", and [`StoreConfigError::Parse`] if the TOML is malformed.
pub fn load_store_config(path: &Path) -> Result<StoreConfig, StoreConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreConfig::default()),
        Err(source) => Err(StoreConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`StoreConfigError::Io`] for file-system failures or
/// [`StoreConfigError::Serialize`] if serialization fails.
pub fn save_store_config(path: &Path, config: &StoreConfig) -> Result<(), StoreConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| StoreConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| StoreConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
