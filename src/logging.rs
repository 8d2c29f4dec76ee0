//! File-backed tracing setup. The terminal belongs to the TUI, so log
//! records go to `$HOME/.local/state/repflow/repflow.log` instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

pub const LOG_ENV_VAR: &str = "REPFLOW_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber writing to `path`.
/// Returns false (and logs nothing) if the file can't be opened or a
/// subscriber is already installed.
pub fn init_with_path(path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}

pub fn init() -> bool {
    match AppDirs::log_path() {
        Some(path) => init_with_path(&path),
        None => false,
    }
}
