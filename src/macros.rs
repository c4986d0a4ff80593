//! Logging macros for ergonomic log message formatting.
//!
//! Every macro takes the logger, a tag naming the call site, and a
//! `format!`-style template. Arguments are captured with `format_args!`, so a
//! message that no sink wants is never formatted.
//!
//! # Examples
//!
//! ```no_run
//! use rolling_logger::prelude::*;
//! use rolling_logger::{enter, exit, info};
//!
//! let logger = Logger::from_env().unwrap();
//!
//! enter!(logger, "handle_request");
//! let items = 3;
//! info!(logger, "handle_request", "served {} items", items);
//! exit!(logger, "handle_request");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```no_run
/// # use rolling_logger::prelude::*;
/// # let logger = Logger::from_env().unwrap();
/// use rolling_logger::log;
/// log!(logger, LogLevel::Info, "startup", "Simple message");
/// log!(logger, LogLevel::Error, "startup", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $tag:expr, $($arg:tt)+) => {
        $logger.log($level, $tag, format_args!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $tag, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $tag, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```no_run
/// # use rolling_logger::prelude::*;
/// # let logger = Logger::from_env().unwrap();
/// use rolling_logger::info;
/// info!(logger, "main", "Application started");
/// info!(logger, "main", "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $tag, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $tag, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $tag, $($arg)+)
    };
}

/// Log an error-level message followed by the exit marker of the tag.
///
/// # Examples
///
/// ```no_run
/// # use rolling_logger::prelude::*;
/// # let logger = Logger::from_env().unwrap();
/// use rolling_logger::exit_error;
/// exit_error!(logger, "connect", "giving up after {} attempts", 5);
/// ```
#[macro_export]
macro_rules! exit_error {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $logger.exit_error($tag, format_args!($($arg)+))
    };
}

/// Log the enter marker of a tag, optionally at an explicit level.
#[macro_export]
macro_rules! enter {
    ($logger:expr, $tag:expr) => {
        $logger.enter($tag)
    };
    ($logger:expr, $tag:expr, $level:expr) => {
        $logger.enter_at($tag, $level)
    };
}

/// Log the exit marker of a tag, optionally at an explicit level.
#[macro_export]
macro_rules! exit {
    ($logger:expr, $tag:expr) => {
        $logger.exit($tag)
    };
    ($logger:expr, $tag:expr, $level:expr) => {
        $logger.exit_at($tag, $level)
    };
}
