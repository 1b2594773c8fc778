//! `tw-settings`: operator tool for a TinyWATCH settings mount point.
//!
//! Runs the same [`Store`] the firmware uses against a directory on the host,
//! so a settings image pulled off a device can be inspected, repaired, and
//! edited with exactly the firmware's load, recovery, and save rules.
//!
//! ```text
//! tw-settings --root ./dump status
//! tw-settings --root ./dump set haptics.enabled off
//! tw-settings --root ./dump wifi --ssid Home --pass hunter2
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tw_settings_core::{CredentialUpdate, SettingGroup, SettingKey};
use tw_settings_store::{
    load_store_config, BackupOutcome, LoadOutcome, SaveOutcome, Store, StoreConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "tw-settings",
    about = "Inspect and edit TinyWATCH settings storage",
    version
)]
struct Cli {
    /// Store deployment config (TOML).  Missing file means all defaults.
    #[arg(long, default_value = "tw-settings.toml", env = "TW_SETTINGS_CONFIG")]
    config: PathBuf,

    /// Overrides `storage.mount_point` from the config file.
    #[arg(long, env = "TW_SETTINGS_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load, then print the committed settings artifact.
    Show,
    /// Load, then print the load and save status.
    Status,
    /// List backup files, newest first.
    Backups,
    /// Copy the committed settings into a new backup.
    Backup,
    /// Replace the settings with factory defaults.
    Reset,
    /// Print one setting.
    Get {
        /// Setting id, e.g. `haptics.enabled`.
        id: String,
    },
    /// Change one setting and save.
    Set { id: String, value: String },
    /// Make a network the primary one and remember it.
    Wifi {
        #[arg(long)]
        ssid: String,
        #[arg(long, default_value = "")]
        pass: String,
    },
    /// List every setting id with its group and label.
    Settings,
}

impl Cli {
    fn store_config(&self) -> anyhow::Result<StoreConfig> {
        let mut store_config = load_store_config(&self.config)
            .with_context(|| format!("reading {}", self.config.display()))?;
        if let Some(root) = &self.root {
            store_config.storage.mount_point = root.clone();
        }
        Ok(store_config)
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn load(store: &mut Store) {
    match store.load() {
        LoadOutcome::Loaded => debug!("settings loaded"),
        other => info!(outcome = ?other, status = %store.load_status(), "settings not loaded as-is"),
    }
}

fn save(store: &mut Store) -> anyhow::Result<()> {
    match store.save(true) {
        SaveOutcome::Failed(detail) => bail!("save failed: {detail}"),
        _ => Ok(()),
    }
}

fn run(command: Command, store: &mut Store, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Show => {
            load(store);
            let text = store.primary_text().context("reading primary settings")?;
            writeln!(out, "{text}")?;
        }
        Command::Status => {
            load(store);
            writeln!(out, "load: {}", store.load_status())?;
            writeln!(out, "save: {}", store.save_status())?;
        }
        Command::Backups => {
            for ordinal in store.backup_ordinals().context("listing backups")? {
                writeln!(out, "{ordinal}")?;
            }
        }
        Command::Backup => match store.backup() {
            BackupOutcome::Created { ordinal } => writeln!(out, "created backup {ordinal}")?,
            BackupOutcome::NothingToBackUp => writeln!(out, "nothing to back up")?,
            BackupOutcome::Failed(detail) => bail!("backup failed: {detail}"),
        },
        Command::Reset => {
            if let SaveOutcome::Failed(detail) = store.create() {
                bail!("reset failed: {detail}");
            }
            writeln!(out, "settings reset to defaults")?;
        }
        Command::Get { id } => {
            let key = SettingKey::from_id(&id)?;
            load(store);
            let value = store.config().get_setting(key);
            writeln!(out, "{}", key.spec().display(&value))?;
        }
        Command::Set { id, value } => {
            let key = SettingKey::from_id(&id)?;
            let parsed = key.spec().parse(&value)?;
            load(store);
            store.config_mut().set_setting(key, parsed)?;
            save(store)?;
            writeln!(out, "{id} = {}", key.spec().display(&store.config().get_setting(key)))?;
        }
        Command::Wifi { ssid, pass } => {
            if ssid.is_empty() {
                bail!("--ssid must not be empty");
            }
            load(store);
            match store.config_mut().update_network_credentials(&ssid, &pass) {
                CredentialUpdate::Updated => writeln!(out, "updated password for {ssid}")?,
                CredentialUpdate::Added => writeln!(out, "added {ssid}")?,
                CredentialUpdate::AddedEvicted(old) => {
                    writeln!(out, "added {ssid}, forgot {}", old.ssid)?
                }
            }
            save(store)?;
        }
        Command::Settings => {
            for group in SettingGroup::ALL {
                writeln!(out, "[{}] {}", group.name(), group.description())?;
                for key in group.keys() {
                    writeln!(out, "  {:<28} {}", key.id(), key.spec().label)?;
                }
            }
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let store_config = cli.store_config()?;

    // RUST_LOG wins; otherwise the level from the deployment config.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&store_config.logging.level)),
        )
        .init();

    let mount = store_config.storage.mount_point.clone();
    let mut store = Store::open(&store_config)
        .with_context(|| format!("opening settings at {}", mount.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &mut store, &mut out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
