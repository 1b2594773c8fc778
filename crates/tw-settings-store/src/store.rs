//! The settings store: one owner of the in-memory [`Config`] and of every
//! artifact that persists it.
//!
//! ```text
//!   load()   primary ──ok──► adopt
//!              │ not found ──► create()
//!              │ I/O error ──► defaults in memory, nothing written
//!              │ corrupt   ──► newest usable backup ──► adopt + re-commit
//!              │                     │ none
//!              │                     └──────────────► create()
//!
//!   save(f)  scheduler gate ──► encode ──► copy old primary ──► commit
//!                                                                 │ ok   ──► prune backups
//!                                                                 │ fail ──► discard copy
//! ```
//!
//! No storage error crosses this boundary.  Every operation records its
//! outcome in the [`StatusReporter`] and falls back to something safe: a
//! backup, the defaults, or the unchanged in-memory settings.

use std::io;

use tracing::{debug, error, info, warn};
use tw_settings_core::{encode, Config};

use crate::application::scheduler::{Clock, SaveOutcome, SaveScheduler};
use crate::application::status::{StatusKind, StatusReporter};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::diagnostics::{DiagnosticKv, Diagnostics, Operation};
use crate::infrastructure::storage::{
    BackupError, BackupRotator, DiskFs, DurableWriter, Filesystem, ReadError, StoreConfig,
    WriteError,
};

/// What [`Store::load`] ended up adopting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The primary artifact decoded.
    Loaded,
    /// The primary was unusable; the backup with this ordinal was adopted.
    Recovered { ordinal: u64 },
    /// There was no primary; defaults were created.
    NotFound,
    /// The primary could not be read.  Defaults are held in memory and
    /// storage was left alone.
    ReadFailed,
    /// Neither the primary nor any backup decoded; defaults were created.
    Defaulted,
}

/// Result of an explicit [`Store::backup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created { ordinal: u64 },
    /// No primary exists yet, or backups are disabled.
    NothingToBackUp,
    Failed(String),
}

pub struct Store {
    fs: Box<dyn Filesystem>,
    writer: DurableWriter,
    rotator: BackupRotator,
    scheduler: SaveScheduler,
    status: StatusReporter,
    diagnostics: Diagnostics,
    config: Config,
}

impl Store {
    /// Builds a store over `fs`.  The settings start at their defaults until
    /// [`load`](Self::load) or [`create`](Self::create) is called.
    pub fn new(
        fs: impl Filesystem + 'static,
        clock: impl Clock + 'static,
        store_config: &StoreConfig,
    ) -> Self {
        let storage = &store_config.storage;
        Self {
            fs: Box::new(fs),
            writer: DurableWriter::new(&storage.primary_file, &storage.staging_file),
            rotator: BackupRotator::new(&storage.backup_prefix, storage.max_backups),
            scheduler: SaveScheduler::new(Box::new(clock), store_config.save.min_interval()),
            status: StatusReporter::new(),
            diagnostics: Diagnostics::new(&storage.log_file),
            config: Config::default(),
        }
    }

    /// Builds a store on the real filesystem at `storage.mount_point`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the mount directory cannot be created.
    pub fn open(store_config: &StoreConfig) -> io::Result<Self> {
        let fs = DiskFs::new(&store_config.storage.mount_point)?;
        Ok(Self::new(fs, SystemClock::new(), store_config))
    }

    /// Sends the latest load and save failures to `kv` as well as the log.
    pub fn with_diagnostic_kv(mut self, kv: impl DiagnosticKv + 'static) -> Self {
        self.diagnostics.set_kv(Box::new(kv));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the settings.  Changes stay in memory until the
    /// next [`save`](Self::save).
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    pub fn load_status(&self) -> String {
        self.status.load_status()
    }

    pub fn save_status(&self) -> String {
        self.status.save_status()
    }

    /// Text of the committed primary artifact.
    ///
    /// # Errors
    ///
    /// Any [`ReadError`] from reading the primary.
    pub fn primary_text(&self) -> Result<String, ReadError> {
        self.writer.read_text(self.fs.as_ref(), self.writer.primary())
    }

    /// Ordinals of the backup set, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::List`] if the mount point cannot be listed.
    pub fn backup_ordinals(&self) -> Result<Vec<u64>, BackupError> {
        self.rotator.list_ordinals(self.fs.as_ref())
    }

    /// Replaces the in-memory settings with what storage holds.
    pub fn load(&mut self) -> LoadOutcome {
        let fs = self.fs.as_ref();
        if self.writer.discard_stale_staging(fs) {
            info!(staging = self.writer.staging(), "discarded staging file from an interrupted commit");
        }

        let err = match self.writer.load_primary(fs) {
            Ok(config) => {
                self.config = config;
                self.status.record_load(StatusKind::Success, "");
                info!(primary = self.writer.primary(), "settings loaded");
                return LoadOutcome::Loaded;
            }
            Err(e) => e,
        };

        if err.is_not_found() {
            info!(primary = self.writer.primary(), "no settings found; creating defaults");
            let missing = format!("{} not found", self.writer.primary());
            match self.create() {
                SaveOutcome::Failed(detail) => self.status.record_load(
                    StatusKind::WriteFailed,
                    format!("{missing}; defaults not saved: {detail}"),
                ),
                _ => self.status.record_load(StatusKind::Created, missing),
            }
            return LoadOutcome::NotFound;
        }

        if let ReadError::Io { .. } = err {
            error!(error = %err, "primary settings unreadable; keeping defaults in memory");
            self.config = Config::default();
            self.diagnostics
                .failure(self.fs.as_ref(), Operation::Load, &err.to_string());
            self.status.record_load(StatusKind::ReadFailed, err.to_string());
            return LoadOutcome::ReadFailed;
        }

        warn!(error = %err, "primary settings unusable; trying backups");
        self.diagnostics
            .failure(self.fs.as_ref(), Operation::Load, &err.to_string());

        if let Some(ordinal) = self.recover_from_backup() {
            return LoadOutcome::Recovered { ordinal };
        }

        error!(error = %err, "no usable backup; falling back to defaults");
        let detail = match self.create() {
            SaveOutcome::Failed(detail) => format!("{err}; defaults not saved: {detail}"),
            _ => err.to_string(),
        };
        self.status.record_load(StatusKind::Defaulted, detail);
        LoadOutcome::Defaulted
    }

    /// Adopts the newest backup that decodes and writes it back as the
    /// primary.  The unusable primary is not snapshotted.
    fn recover_from_backup(&mut self) -> Option<u64> {
        let fs = self.fs.as_ref();
        let ordinals = match self.rotator.list_ordinals(fs) {
            Ok(ordinals) => ordinals,
            Err(e) => {
                warn!(error = %e, "could not list backups");
                return None;
            }
        };

        for ordinal in ordinals {
            let config = match self.rotator.load(fs, &self.writer, ordinal) {
                Ok(config) => config,
                Err(e) => {
                    debug!(ordinal, error = %e, "backup unusable; trying an older one");
                    continue;
                }
            };

            self.config = config;
            let name = self.rotator.backup_name(ordinal);
            let recommit = encode(&self.config)
                .map_err(WriteError::from)
                .and_then(|text| self.writer.commit(fs, &text));
            match recommit {
                Ok(()) => {
                    self.scheduler.record_commit();
                    self.status
                        .record_save(StatusKind::Success, format!("restored from {name}"));
                }
                Err(e) => {
                    warn!(error = %e, "could not write recovered settings back");
                    self.status.record_save(StatusKind::WriteFailed, e.to_string());
                }
            }

            warn!(ordinal, "settings recovered from backup");
            self.diagnostics
                .note(fs, Operation::Load, &format!("recovered from {name}"));
            self.status.record_load(StatusKind::RecoveredFromBackup, name);
            return Some(ordinal);
        }
        None
    }

    /// Persists the settings, subject to the save debounce unless `force`.
    ///
    /// The superseded primary is copied into the backup set first.  A failed
    /// copy is logged and the save goes ahead.  The copy only counts towards
    /// the backup bound once the commit lands; if the commit fails it is
    /// removed again, so repeated failures never push out older backups.
    pub fn save(&mut self, force: bool) -> SaveOutcome {
        let Self {
            fs,
            writer,
            rotator,
            scheduler,
            status,
            diagnostics,
            config,
        } = self;
        let fs: &dyn Filesystem = &**fs;

        let outcome =
            scheduler.request_save(force, || commit_with_backup(fs, writer, rotator, config));
        match &outcome {
            SaveOutcome::Committed => {
                let detail = if force { "forced" } else { "" };
                status.record_save(StatusKind::Success, detail);
            }
            SaveOutcome::Debounced => status.record_save(StatusKind::Debounced, ""),
            SaveOutcome::Failed(detail) => {
                status.record_save(StatusKind::WriteFailed, detail.clone());
                diagnostics.failure(fs, Operation::Save, detail);
            }
        }
        outcome
    }

    /// Resets the settings to defaults and saves them unconditionally.
    pub fn create(&mut self) -> SaveOutcome {
        self.config = Config::default();
        let outcome = self.save(true);
        if outcome == SaveOutcome::Committed {
            self.status.record_save(StatusKind::Created, "");
            self.diagnostics
                .note(self.fs.as_ref(), Operation::Save, "created default settings");
        }
        outcome
    }

    /// Snapshots the committed primary into the backup set now.
    pub fn backup(&mut self) -> BackupOutcome {
        let fs = self.fs.as_ref();
        match self.rotator.snapshot(fs, &self.writer, self.writer.primary()) {
            Ok(Some(ordinal)) => BackupOutcome::Created { ordinal },
            Ok(None) => BackupOutcome::NothingToBackUp,
            Err(e) => {
                warn!(error = %e, "explicit backup failed");
                self.diagnostics
                    .note(fs, Operation::Save, &format!("backup failed: {e}"));
                BackupOutcome::Failed(e.to_string())
            }
        }
    }
}

fn commit_with_backup(
    fs: &dyn Filesystem,
    writer: &DurableWriter,
    rotator: &BackupRotator,
    config: &Config,
) -> Result<(), WriteError> {
    let text = encode(config)?;
    let copied = match rotator.copy(fs, writer, writer.primary()) {
        Ok(copied) => copied,
        Err(e) => {
            warn!(error = %e, "backup before save failed; saving anyway");
            None
        }
    };
    match writer.commit(fs, &text) {
        Ok(()) => {
            if let Some(ordinal) = copied {
                debug!(ordinal, "previous settings backed up");
                rotator.prune(fs);
            }
            Ok(())
        }
        Err(e) => {
            if let Some(ordinal) = copied {
                rotator.discard(fs, ordinal);
            }
            Err(e)
        }
    }
}
