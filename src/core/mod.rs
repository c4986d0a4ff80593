//! Core logger types and traits

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gate;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod properties;
pub mod provider;
pub mod timestamp;

pub use config::LoggerConfig;
pub use diagnostics::{Diagnostic, DiagnosticSink, MemoryDiagnostics, StderrDiagnostics};
pub use error::{LoggerError, Result};
pub use gate::{LevelGate, Visibility};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use properties::PropertySource;
pub use provider::{ConfigProvider, ConfigSource, StaticSource};
