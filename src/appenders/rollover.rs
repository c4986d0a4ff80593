//! Date- and size-triggered rollover of the active log file
//!
//! Rotated files are named `<base>_<YYYY-MM-DD>_<sequence>.<extension>`.
//! The sequence for a date is recomputed from the directory contents on every
//! rotation, so it survives restarts and is never cached in memory.
//!
//! Rollover is best effort. A rotation that cannot be completed is abandoned
//! and reported as [`RotationOutcome::Failed`]; the pending write then goes to
//! the existing file and the rotation is retried on the next write.

use crate::core::config::LoggerConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::timestamp::{format_date_tag, is_before_start_of_day, local_from_system_time};
use chrono::{DateTime, Local, NaiveDate};
use std::fmt;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

/// What the engine decided for the next write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDecision {
    None,
    /// The file belongs to an earlier day; tagged with its modification date
    Date(NaiveDate),
    /// The file exceeded the size threshold; tagged with today's date
    Size(NaiveDate),
}

impl RotationDecision {
    #[must_use]
    pub fn is_due(&self) -> bool {
        !matches!(self, RotationDecision::None)
    }

    /// Date tag for the rotated file name
    #[must_use]
    pub fn tag(&self) -> Option<String> {
        match self {
            RotationDecision::None => None,
            RotationDecision::Date(date) | RotationDecision::Size(date) => {
                Some(format_date_tag(*date))
            }
        }
    }
}

/// Result of a rotation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RotationOutcome {
    NotRotated,
    Rotated {
        decision: RotationDecision,
        from: PathBuf,
        to: PathBuf,
    },
    Failed {
        decision: RotationDecision,
        path: PathBuf,
        reason: String,
    },
}

impl RotationOutcome {
    #[must_use]
    pub fn is_rotated(&self) -> bool {
        matches!(self, RotationOutcome::Rotated { .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, RotationOutcome::Failed { .. })
    }

    /// Destination of a completed rotation
    #[must_use]
    pub fn rotated_to(&self) -> Option<&Path> {
        match self {
            RotationOutcome::Rotated { to, .. } => Some(to),
            _ => None,
        }
    }
}

impl fmt::Display for RotationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationOutcome::NotRotated => write!(f, "No rotation"),
            RotationOutcome::Rotated { from, to, .. } => {
                write!(f, "Rotated '{}' to '{}'", from.display(), to.display())
            }
            RotationOutcome::Failed { path, reason, .. } => write!(
                f,
                "Log rotation of '{}' abandoned: {}. Continuing with current file.",
                path.display(),
                reason
            ),
        }
    }
}

/// The parts of file metadata rollover depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub len: u64,
    pub modified: DateTime<Local>,
}

impl FileStats {
    pub fn from_metadata(metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            len: metadata.len(),
            modified: local_from_system_time(metadata.modified()?),
        })
    }
}

/// Splits a file name at its last `.` into base name and extension
#[must_use]
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => (&file_name[..idx], Some(&file_name[idx + 1..])),
        _ => (file_name, None),
    }
}

/// The sequence component of a rotated file name: the token after the last
/// `_` once the extension is removed
#[must_use]
pub fn sequence_token(file_name: &str) -> &str {
    let (stem, _) = split_extension(file_name);
    stem.rsplit('_').next().unwrap_or(stem)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RolloverEngine;

impl RolloverEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decide whether the active file must be rotated before the next write.
    ///
    /// The date check runs first and short-circuits the size check.
    #[must_use]
    pub fn should_rotate(
        &self,
        stats: &FileStats,
        config: &LoggerConfig,
        now: DateTime<Local>,
    ) -> RotationDecision {
        if !config.do_rollover {
            return RotationDecision::None;
        }

        if config.do_date_rollover && is_before_start_of_day(&stats.modified, &now) {
            return RotationDecision::Date(stats.modified.date_naive());
        }

        if config.do_size_rollover && stats.len > config.rollover_size {
            return RotationDecision::Size(now.date_naive());
        }

        RotationDecision::None
    }

    /// Rename `active` aside according to `decision`.
    ///
    /// The caller must have closed its handle on `active` first.
    pub fn rotate(&self, decision: RotationDecision, active: &Path) -> RotationOutcome {
        let Some(tag) = decision.tag() else {
            return RotationOutcome::NotRotated;
        };

        let failed = |err: LoggerError| RotationOutcome::Failed {
            decision,
            path: active.to_path_buf(),
            reason: err.to_string(),
        };

        let sequence = match self.next_sequence(log_dir_of(active), &tag) {
            Ok(sequence) => sequence,
            Err(e) => return failed(e),
        };

        let target = rotation_target(active, &tag, sequence);
        match fs::rename(active, &target) {
            Ok(()) => RotationOutcome::Rotated {
                decision,
                from: active.to_path_buf(),
                to: target,
            },
            Err(e) => failed(LoggerError::io_operation(
                "rotating log file",
                format!("Failed to rename to '{}'", target.display()),
                e,
            )),
        }
    }

    /// Next free sequence number for `tag`: one past the highest sequence
    /// found among directory entries whose name contains the tag.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be listed or a matching entry carries a
    /// sequence token that is not an integer.
    pub fn next_sequence(&self, dir: &Path, tag: &str) -> Result<u32> {
        let entries = fs::read_dir(dir).map_err(|e| {
            LoggerError::io_operation(
                "listing log directory",
                format!("Failed to read '{}'", dir.display()),
                e,
            )
        })?;

        let mut highest = 0u32;
        for entry in entries {
            let entry = entry.map_err(|e| {
                LoggerError::io_operation(
                    "listing log directory",
                    format!("Failed to read entry in '{}'", dir.display()),
                    e,
                )
            })?;

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.contains(tag) {
                continue;
            }

            let token = sequence_token(&name);
            let sequence: u32 = token.parse().map_err(|_| {
                LoggerError::file_rotation(
                    entry.path().display().to_string(),
                    format!("Invalid sequence number '{}'", token),
                )
            })?;
            highest = highest.max(sequence);
        }

        highest.checked_add(1).ok_or_else(|| {
            LoggerError::file_rotation(
                dir.display().to_string(),
                format!("Sequence numbers exhausted for '{}'", tag),
            )
        })
    }
}

/// `<dir>/<base>_<tag>_<sequence>.<extension>` for the active file
#[must_use]
pub fn rotation_target(active: &Path, tag: &str, sequence: u32) -> PathBuf {
    let file_name = active
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (base, extension) = split_extension(&file_name);

    let rotated = match extension {
        Some(ext) => format!("{}_{}_{}.{}", base, tag, sequence, ext),
        None => format!("{}_{}_{}", base, tag, sequence),
    };
    active.with_file_name(rotated)
}

fn log_dir_of(active: &Path) -> &Path {
    match active.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
