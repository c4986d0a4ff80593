//! Output sinks and file rollover

pub mod console;
pub mod file;
pub mod rollover;

pub use console::{ConsoleAppender, ConsoleCapture};
pub use file::{FileSink, WriteOutcome};
pub use rollover::{FileStats, RolloverEngine, RotationDecision, RotationOutcome};
