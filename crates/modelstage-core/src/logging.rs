//! Tracing subscriber setup for the `modelstage` binary.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the caller. Events go to an append-only log file under the XDG
//! state dir, or to stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Directive used when neither `MODELSTAGE_LOG` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "info,modelstage=debug";

/// Filter variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "MODELSTAGE_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/modelstage/modelstage.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modelstage")?;
    Ok(xdg_dirs
        .get_state_home()
        .join("modelstage")
        .join("modelstage.log"))
}

/// Open `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log dir {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Log to the default file. On error the caller should fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    init_logging_at(&log_file_path()?)
}

/// Log to `path`. Fails if the file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging_at(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("modelstage logging initialized at {}", path.display());
    Ok(())
}

/// Log to stderr. A no-op if a subscriber is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
