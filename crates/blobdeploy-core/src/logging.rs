//! Logging init: file under XDG state dir, or graceful fallback to stderr.
//!
//! The log file is a run history for local use; on a CI runner the home
//! directory is often read-only or discarded, so stderr is the normal case
//! there. Callers never pass URLs carrying a SAS query to `tracing` unmasked;
//! see `redact::Redactor`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,blobdeploy=debug,blobdeploy_core=debug";
const LOG_FILE: &str = "blobdeploy.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/blobdeploy/blobdeploy.log`, without creating anything.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("blobdeploy")?;
    Ok(xdg_dirs.get_state_home().join(LOG_FILE))
}

fn open_log(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Initialize structured logging to the state-dir log file. Returns Err when
/// the file can't be opened or a subscriber is already installed, so the
/// caller can fall back to stderr.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {e}"))?;

    // Ties log entries to the workflow run that produced them.
    let run_id = std::env::var("GITHUB_RUN_ID").ok();
    tracing::info!(run_id = ?run_id, "blobdeploy logging initialized at {}", path.display());

    Ok(path)
}

/// Initialize logging to stderr only. Use when init_logging() fails so the CLI doesn't crash.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
