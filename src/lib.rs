//! # Rolling Logger
//!
//! An embeddable logging facility with level-gated console and file output
//! and automatic rollover of the log file.
//!
//! ## Features
//!
//! - **Level Gating**: Independent console and file thresholds; hidden messages are never formatted
//! - **File Rollover**: Date- and size-triggered rotation to `<base>_<date>_<seq>.<ext>`
//! - **Thread Safe**: Lock-free configuration snapshots, serialized file access
//! - **Never Fails the Host**: I/O problems go to a diagnostic sink, not to callers

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, ConsoleCapture, FileSink, RotationOutcome};
    pub use crate::core::{
        ConfigProvider, ConfigSource, Diagnostic, DiagnosticSink, LevelGate, LogEntry, LogLevel,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, MemoryDiagnostics, PropertySource,
        Result, StaticSource, StderrDiagnostics, Visibility,
    };
}

pub use appenders::{ConsoleAppender, FileSink, RolloverEngine, RotationDecision, RotationOutcome};
pub use core::{
    ConfigProvider, ConfigSource, Diagnostic, DiagnosticSink, LevelGate, LogEntry, LogLevel,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, MemoryDiagnostics, PropertySource, Result,
    StaticSource, StderrDiagnostics, Visibility,
};
