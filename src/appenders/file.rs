//! File sink with lazy open and rollover
//!
//! The sink owns at most one open handle. It is opened on the first write,
//! closed whenever a rotation fires and reopened by the write that follows.
//! Callers serialize access (see [`Logger`](crate::Logger)), which makes the
//! stat, rotate and append sequence one critical section.

use super::rollover::{FileStats, RolloverEngine, RotationOutcome};
use crate::core::config::LoggerConfig;
use crate::core::diagnostics::{Diagnostic, DiagnosticSink, StderrDiagnostics};
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An open handle and the path it was opened against
#[derive(Debug)]
struct OpenFile {
    file: File,
    path: PathBuf,
}

/// What happened to a record handed to [`FileSink::write`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Written {
        path: PathBuf,
        lines: usize,
        rotation: RotationOutcome,
    },
    Skipped {
        reason: String,
    },
}

impl WriteOutcome {
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }

    #[must_use]
    pub fn rotation(&self) -> Option<&RotationOutcome> {
        match self {
            WriteOutcome::Written { rotation, .. } => Some(rotation),
            WriteOutcome::Skipped { .. } => None,
        }
    }
}

pub struct FileSink {
    handle: Option<OpenFile>,
    engine: RolloverEngine,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl FileSink {
    #[must_use]
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(StderrDiagnostics))
    }

    pub fn with_diagnostics(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            handle: None,
            engine: RolloverEngine::new(),
            diagnostics,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Path the current handle was opened against
    #[must_use]
    pub fn open_path(&self) -> Option<&Path> {
        self.handle.as_ref().map(|h| h.path.as_path())
    }

    /// Append `entry` to the active file of `config`, rotating first if due.
    ///
    /// Never fails: I/O problems are reported to the diagnostic sink and the
    /// record is dropped from the file.
    pub fn write(&mut self, entry: &LogEntry, config: &LoggerConfig) -> WriteOutcome {
        let path = config.active_path();
        match self.try_write(entry, config, &path) {
            Ok(outcome) => outcome,
            Err(e) => {
                // A failed write may leave the handle in an unknown state
                self.close();
                let reason = e.to_string();
                self.diagnostics.report(Diagnostic::FileWriteFailed {
                    path,
                    reason: reason.clone(),
                });
                WriteOutcome::Skipped { reason }
            }
        }
    }

    fn try_write(
        &mut self,
        entry: &LogEntry,
        config: &LoggerConfig,
        path: &Path,
    ) -> Result<WriteOutcome> {
        fs::create_dir_all(config.log_dir()).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", config.log_dir().display()),
                e,
            )
        })?;

        // The configuration may have been refreshed to point elsewhere
        if self.open_path().is_some_and(|open| open != path) {
            self.close();
        }

        self.ensure_open(path)?;
        let rotation = self.check_rollover(config, path);
        self.ensure_open(path)?;

        let lines = entry.formatted_lines();
        let mut buffer = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in &lines {
            buffer.push_str(line);
            buffer.push('\n');
        }

        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| LoggerError::file_sink(path.display().to_string(), "File not open"))?;

        handle.file.write_all(buffer.as_bytes()).map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        handle.file.sync_data().map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Failed to flush: {}", e),
            )
        })?;

        Ok(WriteOutcome::Written {
            path: path.to_path_buf(),
            lines: lines.len(),
            rotation,
        })
    }

    fn ensure_open(&mut self, path: &Path) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        self.handle = Some(OpenFile {
            file,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Rotate the active file if the engine says so.
    ///
    /// Stat failures skip the check for this write.
    fn check_rollover(&mut self, config: &LoggerConfig, path: &Path) -> RotationOutcome {
        if !config.do_rollover {
            return RotationOutcome::NotRotated;
        }

        let metadata = match &self.handle {
            Some(handle) => handle.file.metadata(),
            None => fs::metadata(path),
        };
        let Ok(stats) = metadata.and_then(|m| FileStats::from_metadata(&m)) else {
            return RotationOutcome::NotRotated;
        };

        let decision = self.engine.should_rotate(&stats, config, Local::now());
        if !decision.is_due() {
            return RotationOutcome::NotRotated;
        }

        // Release the handle before renaming; the next write reopens lazily
        self.close();
        let outcome = self.engine.rotate(decision, path);
        self.diagnostics.report(Diagnostic::Rotation(outcome.clone()));
        outcome
    }

    /// Release the handle. A later write reopens it.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.file.sync_all();
        }
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
