//! Level-gated dispatch
//!
//! A record is visible on a sink when its level is at or above that sink's
//! threshold. Nothing else suppresses output.

use super::config::LoggerConfig;
use super::log_level::LogLevel;

/// Which sinks a record reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub console: bool,
    pub file: bool,
}

impl Visibility {
    pub const HIDDEN: Visibility = Visibility {
        console: false,
        file: false,
    };

    /// No sink wants the record, so it must not even be formatted
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        !self.console && !self.file
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGate {
    pub console_threshold: LogLevel,
    pub file_threshold: LogLevel,
}

impl LevelGate {
    #[must_use]
    pub fn new(console_threshold: LogLevel, file_threshold: LogLevel) -> Self {
        Self {
            console_threshold,
            file_threshold,
        }
    }

    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new(config.log_level, config.log_file_level)
    }

    #[must_use]
    pub fn evaluate(&self, level: LogLevel) -> Visibility {
        if level == LogLevel::None {
            return Visibility::HIDDEN;
        }
        Visibility {
            console: level >= self.console_threshold,
            file: level >= self.file_threshold,
        }
    }

    /// Visibility of an enter/exit record.
    ///
    /// With enter/exit logging switched off no comparison is made at all.
    #[must_use]
    pub fn evaluate_enter_exit(&self, enabled: bool, level: LogLevel) -> Visibility {
        if !enabled {
            return Visibility::HIDDEN;
        }
        self.evaluate(level)
    }
}
