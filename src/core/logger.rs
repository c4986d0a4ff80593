//! Main logger implementation

use super::{
    config::LoggerConfig,
    diagnostics::{Diagnostic, DiagnosticSink, StderrDiagnostics},
    error::Result,
    gate::{LevelGate, Visibility},
    log_entry::LogEntry,
    log_level::LogLevel,
    properties::PropertySource,
    provider::{ConfigProvider, ConfigSource, StaticSource},
};
use crate::appenders::{ConsoleAppender, FileSink};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

pub const ENTER_MESSAGE: &str = "[ENTER]";
pub const EXIT_MESSAGE: &str = "[EXIT]";

/// Level-gated logger writing to the console and a rolling file
///
/// All methods take `&self`; share the logger across threads with `Arc`.
/// Logging never returns an error and never panics on I/O failure: problems
/// go to the configured [`DiagnosticSink`].
///
/// # Example
///
/// ```no_run
/// use rolling_logger::{info, Logger, LoggerConfig, LogLevel};
///
/// let logger = Logger::with_config(
///     LoggerConfig::new()
///         .with_log_dir("logs")
///         .with_console_level(LogLevel::Info),
/// );
///
/// logger.enter("main");
/// info!(logger, "main", "listening on port {}", 8080);
/// logger.exit("main");
/// ```
pub struct Logger {
    provider: ConfigProvider,
    console: Mutex<ConsoleAppender>,
    file: Mutex<FileSink>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Logger {
    /// Logger configured from the environment and property file.
    ///
    /// Caching follows `KloggerUseCache`.
    ///
    /// # Errors
    ///
    /// Fails only when the property file location cannot be determined.
    pub fn from_env() -> Result<Self> {
        let source = PropertySource::from_env();
        let use_cache = source.cache_enabled();
        Self::builder().source(source).use_cache(use_cache).build()
    }

    /// Logger with a fixed configuration
    #[must_use]
    pub fn with_config(config: LoggerConfig) -> Self {
        let diagnostics: Arc<dyn DiagnosticSink> = Arc::new(StderrDiagnostics);
        let provider = ConfigProvider::new(StaticSource(config));
        // A static source cannot fail
        let _ = provider.get(diagnostics.as_ref());
        Self {
            provider,
            console: Mutex::new(ConsoleAppender::new()),
            file: Mutex::new(FileSink::with_diagnostics(Arc::clone(&diagnostics))),
            diagnostics,
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// The configuration snapshot in effect for this call.
    ///
    /// A failed reload is reported and the previous snapshot is used.
    #[must_use]
    pub fn config(&self) -> Option<Arc<LoggerConfig>> {
        match self.provider.get(self.diagnostics.as_ref()) {
            Ok(config) => Some(config),
            Err(e) => {
                self.diagnostics.report(Diagnostic::ConfigReloadFailed {
                    reason: e.to_string(),
                });
                self.provider.current()
            }
        }
    }

    /// Reload the configuration and swap it in for all later calls
    ///
    /// # Errors
    ///
    /// Returns the source's error; the previous configuration stays active.
    pub fn refresh_config(&self) -> Result<Arc<LoggerConfig>> {
        self.provider
            .refresh(self.diagnostics.as_ref())
            .inspect_err(|e| {
                self.diagnostics.report(Diagnostic::ConfigReloadFailed {
                    reason: e.to_string(),
                })
            })
    }

    pub fn log(&self, level: LogLevel, tag: &str, args: fmt::Arguments<'_>) {
        let Some(config) = self.config() else {
            return;
        };
        let visibility = LevelGate::from_config(&config).evaluate(level);
        self.dispatch(visibility, &config, level, tag, args);
    }

    #[inline]
    pub fn trace(&self, tag: &str, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, tag, args);
    }

    #[inline]
    pub fn debug(&self, tag: &str, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, tag, args);
    }

    #[inline]
    pub fn info(&self, tag: &str, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, tag, args);
    }

    #[inline]
    pub fn warn(&self, tag: &str, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, tag, args);
    }

    #[inline]
    pub fn error(&self, tag: &str, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, tag, args);
    }

    /// Log an error and then the exit of `tag`
    pub fn exit_error(&self, tag: &str, args: fmt::Arguments<'_>) {
        self.error(tag, args);
        self.exit(tag);
    }

    /// Mark the start of `tag` at the configured enter level
    pub fn enter(&self, tag: &str) {
        self.enter_exit(tag, None, true);
    }

    /// Mark the start of `tag` at `level`
    pub fn enter_at(&self, tag: &str, level: LogLevel) {
        self.enter_exit(tag, Some(level), true);
    }

    /// Mark the end of `tag` at the configured exit level
    pub fn exit(&self, tag: &str) {
        self.enter_exit(tag, None, false);
    }

    /// Mark the end of `tag` at `level`
    pub fn exit_at(&self, tag: &str, level: LogLevel) {
        self.enter_exit(tag, Some(level), false);
    }

    /// Release the log file handle; the next file write reopens it
    pub fn close(&self) {
        self.file.lock().close();
    }

    pub fn diagnostics(&self) -> &Arc<dyn DiagnosticSink> {
        &self.diagnostics
    }

    fn enter_exit(&self, tag: &str, level: Option<LogLevel>, entering: bool) {
        let Some(config) = self.config() else {
            return;
        };

        let (default_level, message) = if entering {
            (config.enter_log_level, ENTER_MESSAGE)
        } else {
            (config.exit_log_level, EXIT_MESSAGE)
        };
        let level = level.unwrap_or(default_level);
        let visibility =
            LevelGate::from_config(&config).evaluate_enter_exit(config.do_enter_exit_logs, level);
        self.dispatch(visibility, &config, level, tag, format_args!("{}", message));
    }

    fn dispatch(
        &self,
        visibility: Visibility,
        config: &LoggerConfig,
        level: LogLevel,
        tag: &str,
        args: fmt::Arguments<'_>,
    ) {
        if visibility.is_hidden() {
            return;
        }

        let entry = LogEntry::new(level, tag, fmt::format(args));

        if visibility.console {
            if let Err(e) = self.console.lock().append(&entry) {
                self.diagnostics.report(Diagnostic::ConsoleWriteFailed {
                    reason: e.to_string(),
                });
            }
        }

        if visibility.file {
            // Failures are reported by the sink itself
            let _ = self.file.lock().write(&entry, config);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rolling_logger::prelude::*;
/// use std::sync::Arc;
///
/// let (console, _capture) = ConsoleAppender::captured();
/// let logger = Logger::builder()
///     .config(LoggerConfig::new().with_log_dir("target/doc-logs"))
///     .console(console)
///     .diagnostics(Arc::new(MemoryDiagnostics::new()))
///     .use_cache(false)
///     .build()
///     .unwrap();
/// # drop(logger);
/// ```
pub struct LoggerBuilder {
    source: Option<Box<dyn ConfigSource>>,
    use_cache: bool,
    console: Option<ConsoleAppender>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            source: None,
            use_cache: true,
            console: None,
            diagnostics: None,
        }
    }

    /// Where configuration snapshots come from
    ///
    /// Defaults to [`PropertySource::from_env`].
    #[must_use = "builder methods return a new value"]
    pub fn source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Use a fixed configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(self, config: LoggerConfig) -> Self {
        self.source(StaticSource(config))
    }

    /// Cache snapshots between calls (default `true`)
    #[must_use = "builder methods return a new value"]
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, console: ConsoleAppender) -> Self {
        self.console = Some(console);
        self
    }

    /// Sink for the logger's own diagnostics (default stderr)
    #[must_use = "builder methods return a new value"]
    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Build the Logger, loading the first configuration snapshot
    ///
    /// # Errors
    ///
    /// Returns the source's fatal error, e.g. an unresolvable property file.
    pub fn build(self) -> Result<Logger> {
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(StderrDiagnostics));
        let source = self
            .source
            .unwrap_or_else(|| Box::new(PropertySource::from_env()));
        let provider = ConfigProvider::from_boxed(source).with_cache(self.use_cache);

        provider.get(diagnostics.as_ref())?;

        Ok(Logger {
            provider,
            console: Mutex::new(self.console.unwrap_or_default()),
            file: Mutex::new(FileSink::with_diagnostics(Arc::clone(&diagnostics))),
            diagnostics,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
