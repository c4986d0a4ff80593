//! Logger configuration snapshot

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROPERTY_FILE: &str = "properties/klogger-properties.yml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE_NAME: &str = "application.log";
/// 100 MiB
pub const DEFAULT_ROLLOVER_SIZE: u64 = 104_857_600;

/// A complete, immutable logger configuration
///
/// Values are shared as `Arc<LoggerConfig>` and never mutated in place; a
/// refresh replaces the whole snapshot.
///
/// # Examples
///
/// ```
/// use rolling_logger::{LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::new()
///     .with_log_dir("/var/log/myapp")
///     .with_file_name("myapp.log")
///     .with_rollover_size(10 * 1024 * 1024)
///     .with_console_level(LogLevel::Warn)
///     .with_file_level(LogLevel::Debug);
///
/// assert_eq!(config.active_path().to_str(), Some("/var/log/myapp/myapp.log"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LoggerConfig {
    /// Property file this snapshot was read from
    pub prop_file_name: PathBuf,
    /// Directory holding the active and rotated files
    pub log_file_dir: PathBuf,
    /// Active file name, base name and extension
    pub log_file_name: String,
    /// Master switch for both rollover triggers
    pub do_rollover: bool,
    pub do_date_rollover: bool,
    pub do_size_rollover: bool,
    /// Size in bytes the active file must exceed before a size rollover
    pub rollover_size: u64,
    /// Console threshold
    pub log_level: LogLevel,
    /// File threshold
    pub log_file_level: LogLevel,
    pub enter_log_level: LogLevel,
    pub exit_log_level: LogLevel,
    pub do_enter_exit_logs: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            prop_file_name: PathBuf::from(DEFAULT_PROPERTY_FILE),
            log_file_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            do_rollover: true,
            do_date_rollover: true,
            do_size_rollover: true,
            rollover_size: DEFAULT_ROLLOVER_SIZE,
            log_level: LogLevel::Debug,
            log_file_level: LogLevel::Debug,
            enter_log_level: LogLevel::Info,
            exit_log_level: LogLevel::Info,
            do_enter_exit_logs: true,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_file_dir = dir.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rollover(mut self, enabled: bool) -> Self {
        self.do_rollover = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_date_rollover(mut self, enabled: bool) -> Self {
        self.do_date_rollover = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_size_rollover(mut self, enabled: bool) -> Self {
        self.do_size_rollover = enabled;
        self
    }

    /// Set the size threshold in bytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rollover_size(mut self, bytes: u64) -> Self {
        self.rollover_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_file_level(mut self, level: LogLevel) -> Self {
        self.log_file_level = level;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_enter_exit_levels(mut self, enter: LogLevel, exit: LogLevel) -> Self {
        self.enter_log_level = enter;
        self.exit_log_level = exit;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_enter_exit_logs(mut self, enabled: bool) -> Self {
        self.do_enter_exit_logs = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_prop_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.prop_file_name = path.into();
        self
    }

    /// Path of the active log file
    #[must_use]
    pub fn active_path(&self) -> PathBuf {
        self.log_file_dir.join(&self.log_file_name)
    }

    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.log_file_dir
    }

    #[must_use]
    pub fn console_level(&self) -> LogLevel {
        self.log_level
    }

    #[must_use]
    pub fn file_level(&self) -> LogLevel {
        self.log_file_level
    }
}
