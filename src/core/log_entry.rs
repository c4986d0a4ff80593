//! Log entry structure

use super::log_level::LogLevel;
use super::timestamp::format_line_timestamp;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    /// Caller-supplied identifier, typically the function or method name
    pub tag: String,
    /// Fully formatted body; may contain line breaks
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(Local::now(), level, tag, message)
    }

    pub fn at(
        timestamp: DateTime<Local>,
        level: LogLevel,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// `<timestamp> <LEVEL> <tag>` shared by every physical line of this entry
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "{} {} {}",
            format_line_timestamp(&self.timestamp),
            self.level,
            self.tag
        )
    }

    /// Message split on line breaks, `\r\n` endings included
    pub fn message_lines(&self) -> impl Iterator<Item = &str> {
        self.message
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    /// One self-describing physical line per line of the message, without
    /// trailing newlines.
    ///
    /// Embedded line breaks are not escaped: each line repeats the header so
    /// downstream parsers can attribute it without context.
    #[must_use]
    pub fn formatted_lines(&self) -> Vec<String> {
        let header = self.header();
        self.message_lines()
            .map(|line| format!("{} {}", header, line))
            .collect()
    }
}
