//! Diagnostic stream for the logger's own failures
//!
//! A logger cannot log its own problems through itself. Configuration notes,
//! rotation outcomes and I/O failures go to a [`DiagnosticSink`] instead. The
//! default sink prints to stderr; tests install [`MemoryDiagnostics`] and
//! assert on the recorded values.

use crate::appenders::rollover::RotationOutcome;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The property file could not be read or parsed; every property falls
    /// back to the environment or its default.
    PropertyFileUnavailable { path: PathBuf, reason: String },

    /// A single property was malformed and its default was used.
    ConfigDefaulted { property: String, reason: String },

    /// Reloading the configuration failed; the previous snapshot stays active.
    ConfigReloadFailed { reason: String },

    /// A rotation was performed or abandoned.
    Rotation(RotationOutcome),

    /// A file write was skipped.
    FileWriteFailed { path: PathBuf, reason: String },

    ConsoleWriteFailed { reason: String },
}

impl Diagnostic {
    /// Whether this reports something going wrong, as opposed to a routine note
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            Diagnostic::Rotation(outcome) => outcome.is_failed(),
            Diagnostic::ConfigDefaulted { .. } | Diagnostic::PropertyFileUnavailable { .. } => {
                false
            }
            _ => true,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PropertyFileUnavailable { path, reason } => write!(
                f,
                "Property file '{}' unavailable, using environment and defaults: {}",
                path.display(),
                reason
            ),
            Diagnostic::ConfigDefaulted { property, reason } => {
                write!(f, "Invalid value for property {}, using default: {}", property, reason)
            }
            Diagnostic::ConfigReloadFailed { reason } => write!(
                f,
                "Configuration reload failed, keeping previous configuration: {}",
                reason
            ),
            Diagnostic::Rotation(outcome) => write!(f, "{}", outcome),
            Diagnostic::FileWriteFailed { path, reason } => {
                write!(f, "Failed to write log file '{}': {}", path.display(), reason)
            }
            Diagnostic::ConsoleWriteFailed { reason } => {
                write!(f, "Failed to write to console: {}", reason)
            }
        }
    }
}

/// Receiver of [`Diagnostic`] values
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Prints diagnostics to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDiagnostics;

impl DiagnosticSink for StderrDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            // Successful rotations are routine
            Diagnostic::Rotation(outcome) if !outcome.is_failed() => {}
            d if d.is_failure() => eprintln!("[LOGGER ERROR] {}", d),
            d => eprintln!("[LOGGER WARNING] {}", d),
        }
    }
}

/// Records diagnostics in memory
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock())
    }

    #[must_use]
    pub fn failures(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .iter()
            .filter(|d| d.is_failure())
            .cloned()
            .collect()
    }

    /// Rotation outcomes in the order they were reported
    #[must_use]
    pub fn rotations(&self) -> Vec<RotationOutcome> {
        self.events
            .lock()
            .iter()
            .filter_map(|d| match d {
                Diagnostic::Rotation(outcome) => Some(outcome.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.events.lock().push(diagnostic);
    }
}
