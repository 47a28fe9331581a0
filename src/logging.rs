//! Logging setup.
//!
//! Everything logs through the `log` facade. `init_logging` installs
//! `env_logger` with an `info` default (overridable by `RUST_LOG`). With a log
//! directory configured, output goes to one file per day and old files are
//! pruned.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Local;
use env_logger::{Builder, Env, Target};

use crate::config::AppConfig;
use crate::error::{CuImageError, CuImageResult, ResultExt};

/// Maximum number of log files to keep
pub const MAX_LOG_FILES: usize = 5;

const DEFAULT_FILTER: &str = "info";

/// Install the global logger.
///
/// Fails if the log directory cannot be created or a logger is already set.
pub fn init_logging(config: &AppConfig) -> CuImageResult<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));

    let log_path = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = current_log_path(dir);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            builder.target(Target::Pipe(Box::new(file)));
            Some(path)
        },
        None => None,
    };

    builder
        .try_init()
        .map_err(|e| CuImageError::Config(format!("Logger already initialized: {}", e)))?;

    log::info!("[LOGGING] Logging system initialized");
    if let (Some(dir), Some(path)) = (&config.log_dir, log_path) {
        log::info!("[LOGGING] Log file: {:?}", path);
        let removed = cleanup_old_logs(dir);
        if removed > 0 {
            log::debug!("[LOGGING] Removed {} old log files", removed);
        }
    }

    Ok(())
}

/// Path of today's log file (one per day).
pub fn current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("cuimage_{}.log", date))
}

/// Keep the newest `MAX_LOG_FILES` `.log` files. Returns how many were removed.
fn cleanup_old_logs(log_dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return 0;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "log")
                .unwrap_or(false)
        })
        .collect();

    // Newest first; ties broken by name so dated files sort sensibly
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time
            .cmp(&a_time)
            .then_with(|| b.file_name().cmp(&a.file_name()))
    });

    log_files
        .into_iter()
        .skip(MAX_LOG_FILES)
        .filter(|file| fs::remove_file(file.path()).is_ok())
        .count()
}
