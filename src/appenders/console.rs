//! Console appender implementation

use crate::core::{LogEntry, LogLevel, LoggerError, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Where console output goes
#[derive(Debug, Clone)]
enum ConsoleTarget {
    /// stdout, with errors on stderr
    Std,
    /// An in-memory buffer shared with a [`ConsoleCapture`]
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Read side of a capturing [`ConsoleAppender`]
#[derive(Debug, Clone)]
pub struct ConsoleCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl ConsoleCapture {
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

#[derive(Debug)]
pub struct ConsoleAppender {
    use_colors: bool,
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            target: ConsoleTarget::Std,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            target: ConsoleTarget::Std,
        }
    }

    /// An appender writing uncolored lines into memory, and the handle to read them
    ///
    /// # Example
    ///
    /// ```
    /// use rolling_logger::appenders::ConsoleAppender;
    ///
    /// let (appender, capture) = ConsoleAppender::captured();
    /// assert!(capture.is_empty());
    /// # drop(appender);
    /// ```
    #[must_use]
    pub fn captured() -> (Self, ConsoleCapture) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let appender = Self {
            use_colors: false,
            target: ConsoleTarget::Buffer(Arc::clone(&buffer)),
        };
        (appender, ConsoleCapture { buffer })
    }

    /// Print every physical line of `entry`
    pub fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut output = String::new();
        for line in entry.message_lines() {
            output.push_str(&self.format_line(entry, line));
            output.push('\n');
        }

        let written = match &self.target {
            ConsoleTarget::Buffer(buffer) => {
                buffer.lock().extend_from_slice(output.as_bytes());
                Ok(())
            }
            // Route errors to stderr, others to stdout
            ConsoleTarget::Std => match entry.level {
                LogLevel::Error => std::io::stderr().lock().write_all(output.as_bytes()),
                _ => std::io::stdout().lock().write_all(output.as_bytes()),
            },
        };
        written.map_err(|e| LoggerError::console(e.to_string()))
    }

    fn format_line(&self, entry: &LogEntry, line: &str) -> String {
        if !self.use_colors {
            return format!("{} {}", entry.header(), line);
        }

        #[cfg(feature = "console")]
        {
            use colored::Colorize;
            let level = entry.level.to_str().color(entry.level.color_code());
            format!(
                "{} {} {} {}",
                crate::core::timestamp::format_line_timestamp(&entry.timestamp),
                level,
                entry.tag,
                line
            )
        }

        #[cfg(not(feature = "console"))]
        {
            format!("{} {}", entry.header(), line)
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}
