use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::constants::LOG_BUFFER_CAPACITY;

/// Most recent log lines of the whole process, oldest first
static BUFFER: Lazy<Mutex<VecDeque<String>>> =
    Lazy::new(|| Mutex::new(VecDeque::with_capacity(LOG_BUFFER_CAPACITY)));

/// Log file the dispatch appends to, when file logging is enabled
static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Whether our `fern` dispatch became the `log` backend
static INSTALLED: OnceCell<bool> = OnceCell::new();

/// Handle on the process-wide log sink
///
/// The first call to [`Logger::from_config`] installs a `fern` dispatch as
/// the `log` facade backend. Every record, whether from `info!`/`error!` in
/// the library or from [`Logger::log`], lands in one in-memory ring and, when
/// enabled, in the log file. All handles see the same entries.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    enabled: bool,
}

impl Logger {
    /// Create a logger from the `logging.enabled` setting
    ///
    /// The latest call decides whether the log file is written.
    pub fn from_config(enabled: bool) -> Result<Self> {
        let file = if enabled {
            let path = Self::get_log_file_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = fern::log_file(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(file)
        } else {
            None
        };
        *LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner) = file;

        INSTALLED.get_or_init(install);
        Ok(Self { enabled })
    }

    /// Whether this logger was configured to write the log file
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether records are currently being appended to the log file
    pub fn has_file_writer(&self) -> bool {
        LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        if INSTALLED.get().copied().unwrap_or(false) {
            info!("{message}");
        } else {
            // Another backend owns the facade
            push_line(format!("[{}] INFO {}", Utc::now().format("%H:%M:%S%.3f"), message));
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        BUFFER
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .cloned()
            .collect()
    }

    /// Clear all logs
    pub fn clear(&self) {
        BUFFER.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Path of the log file under the XDG data directory
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("course4me").join("course4me.log"))
    }
}

fn install() -> bool {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {} {}",
                Utc::now().format("%H:%M:%S%.3f"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("sqlx", log::LevelFilter::Warn)
        .level_for("sea_orm", log::LevelFilter::Warn)
        .chain(fern::Output::call(|record| push_line(record.args().to_string())))
        .apply()
        .is_ok()
}

fn push_line(line: String) {
    if let Some(file) = LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner).as_mut() {
        let _ = writeln!(file, "{line}");
    }

    let mut logs = BUFFER.lock().unwrap_or_else(PoisonError::into_inner);
    if logs.len() == LOG_BUFFER_CAPACITY {
        logs.pop_front();
    }
    logs.push_back(line);
}
