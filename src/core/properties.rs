//! Configuration from environment variables and a YAML property file
//!
//! Each property is resolved independently, in order:
//!
//! 1. the environment variable `Klogger<Name>` when set and non-empty,
//! 2. the `<Name>` entry of the `klogger:` section of the property file,
//! 3. the compiled default.
//!
//! The property file itself is located through `KloggerPropFileName`,
//! defaulting to `properties/klogger-properties.yml`.
//!
//! ```yaml
//! klogger:
//!   LogFileDir: logs
//!   LogFileName: application.log
//!   DoSizeRollover: true
//!   RolloverSize: 10485760
//!   LogLevel: info
//!   LogFileLevel: 2
//! ```

use super::config::LoggerConfig;
use super::diagnostics::{Diagnostic, DiagnosticSink};
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::provider::ConfigSource;
use serde_yaml::{Mapping, Value};
use std::env::VarError;
use std::path::PathBuf;
use std::sync::Arc;

pub const ENV_PREFIX: &str = "Klogger";
/// Section of the property file holding logger properties
pub const PROPERTY_SECTION: &str = "klogger";
/// Set to `false` to disable configuration caching
pub const USE_CACHE_ENV: &str = "KloggerUseCache";

pub const PROP_FILE_NAME: &str = "PropFileName";
pub const LOG_FILE_DIR: &str = "LogFileDir";
pub const LOG_FILE_NAME: &str = "LogFileName";
pub const DO_ROLLOVER: &str = "DoRollover";
pub const DO_DATE_ROLLOVER: &str = "DoDateRollover";
pub const DO_SIZE_ROLLOVER: &str = "DoSizeRollover";
pub const ROLLOVER_SIZE: &str = "RolloverSize";
pub const LOG_LEVEL: &str = "LogLevel";
pub const LOG_FILE_LEVEL: &str = "LogFileLevel";
pub const ENTER_LOG_LEVEL: &str = "EnterLogLevel";
pub const EXIT_LOG_LEVEL: &str = "ExitLogLevel";
pub const DO_ENTER_EXIT_LOGS: &str = "DoEnterExitLogs";

/// Environment lookup, replaceable so tests do not touch the process environment
pub type EnvLookup = Arc<dyn Fn(&str) -> std::result::Result<String, VarError> + Send + Sync>;

#[must_use]
pub fn env_var_name(property: &str) -> String {
    format!("{}{}", ENV_PREFIX, property)
}

/// Where a raw property value came from
enum RawProperty<'a> {
    Env(String),
    File(&'a Value),
}

/// Conversion from a raw property value into a typed one
trait FromProperty: Sized {
    fn from_env_str(raw: &str) -> std::result::Result<Self, String>;
    fn from_yaml(value: &Value) -> std::result::Result<Self, String>;
}

impl FromProperty for String {
    fn from_env_str(raw: &str) -> std::result::Result<Self, String> {
        Ok(raw.to_string())
    }

    fn from_yaml(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(s) if !s.is_empty() => Ok(s.clone()),
            Value::String(_) => Err("empty string".to_string()),
            other => Err(format!("expected a string, found {:?}", other)),
        }
    }
}

impl FromProperty for PathBuf {
    fn from_env_str(raw: &str) -> std::result::Result<Self, String> {
        Ok(PathBuf::from(raw))
    }

    fn from_yaml(value: &Value) -> std::result::Result<Self, String> {
        String::from_yaml(value).map(PathBuf::from)
    }
}

impl FromProperty for bool {
    fn from_env_str(raw: &str) -> std::result::Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(format!("expected a boolean, found '{}'", raw)),
        }
    }

    fn from_yaml(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => Self::from_env_str(s),
            other => Err(format!("expected a boolean, found {:?}", other)),
        }
    }
}

impl FromProperty for u64 {
    fn from_env_str(raw: &str) -> std::result::Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|e| format!("expected a byte count, found '{}': {}", raw, e))
    }

    fn from_yaml(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| format!("expected a non-negative integer, found {}", n)),
            Value::String(s) => Self::from_env_str(s),
            other => Err(format!("expected a byte count, found {:?}", other)),
        }
    }
}

impl FromProperty for LogLevel {
    fn from_env_str(raw: &str) -> std::result::Result<Self, String> {
        raw.parse()
    }

    fn from_yaml(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .and_then(LogLevel::from_index)
                .ok_or_else(|| format!("Invalid log level index: {}", n)),
            Value::String(s) => s.parse(),
            other => Err(format!("expected a log level, found {:?}", other)),
        }
    }
}

/// Loads [`LoggerConfig`] from the environment and a YAML property file
pub struct PropertySource {
    env: EnvLookup,
}

impl PropertySource {
    /// Source reading the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_lookup(|name: &str| std::env::var(name))
    }

    /// Source reading variables through `lookup`
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, VarError> + Send + Sync + 'static,
    {
        Self {
            env: Arc::new(lookup),
        }
    }

    /// Whether configuration snapshots should be cached.
    ///
    /// Only an explicit `KloggerUseCache=false` turns caching off.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        !matches!((self.env)(USE_CACHE_ENV), Ok(v) if v.trim().eq_ignore_ascii_case("false"))
    }

    /// Resolve the property file path.
    ///
    /// This is the one input the logger cannot guess: a variable that is set
    /// but unreadable is fatal.
    pub fn property_file(&self) -> Result<PathBuf> {
        let variable = env_var_name(PROP_FILE_NAME);
        match (self.env)(&variable) {
            Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            Ok(_) | Err(VarError::NotPresent) => Ok(LoggerConfig::default().prop_file_name),
            Err(VarError::NotUnicode(raw)) => Err(LoggerError::property_source(
                variable,
                format!("value {:?} is not valid unicode", raw),
            )),
        }
    }

    /// The `klogger:` section of the property file, if it can be read
    fn read_section(&self, path: &PathBuf, diagnostics: &dyn DiagnosticSink) -> Option<Mapping> {
        let unavailable = |reason: String| {
            diagnostics.report(Diagnostic::PropertyFileUnavailable {
                path: path.clone(),
                reason,
            });
            None
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => return unavailable(e.to_string()),
        };

        let document: Value = match serde_yaml::from_str(&contents) {
            Ok(document) => document,
            Err(e) => return unavailable(format!("failed to parse YAML: {}", e)),
        };

        match document.get(PROPERTY_SECTION) {
            Some(Value::Mapping(section)) => Some(section.clone()),
            Some(Value::Null) | None => Some(Mapping::new()),
            Some(_) => unavailable(format!("'{}' is not a mapping", PROPERTY_SECTION)),
        }
    }

    fn raw<'a>(
        &self,
        name: &str,
        section: Option<&'a Mapping>,
        diagnostics: &dyn DiagnosticSink,
    ) -> Option<RawProperty<'a>> {
        match (self.env)(&env_var_name(name)) {
            Ok(value) if !value.is_empty() => return Some(RawProperty::Env(value)),
            Ok(_) | Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(raw)) => diagnostics.report(Diagnostic::ConfigDefaulted {
                property: name.to_string(),
                reason: format!("environment value {:?} is not valid unicode", raw),
            }),
        }

        section
            .and_then(|s| s.get(name))
            .filter(|v| !v.is_null())
            .map(RawProperty::File)
    }

    fn resolve<T: FromProperty>(
        &self,
        name: &str,
        section: Option<&Mapping>,
        default: T,
        diagnostics: &dyn DiagnosticSink,
    ) -> T {
        let parsed = match self.raw(name, section, diagnostics) {
            Some(RawProperty::Env(raw)) => T::from_env_str(&raw),
            Some(RawProperty::File(value)) => T::from_yaml(value),
            None => return default,
        };

        parsed.unwrap_or_else(|reason| {
            diagnostics.report(Diagnostic::ConfigDefaulted {
                property: name.to_string(),
                reason,
            });
            default
        })
    }
}

impl Default for PropertySource {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ConfigSource for PropertySource {
    fn load(&self, diagnostics: &dyn DiagnosticSink) -> Result<LoggerConfig> {
        let prop_file_name = self.property_file()?;
        let section = self.read_section(&prop_file_name, diagnostics);
        let section = section.as_ref();
        let d = LoggerConfig::default();

        Ok(LoggerConfig {
            log_file_dir: self.resolve(LOG_FILE_DIR, section, d.log_file_dir, diagnostics),
            log_file_name: self.resolve(LOG_FILE_NAME, section, d.log_file_name, diagnostics),
            do_rollover: self.resolve(DO_ROLLOVER, section, d.do_rollover, diagnostics),
            do_date_rollover: self.resolve(
                DO_DATE_ROLLOVER,
                section,
                d.do_date_rollover,
                diagnostics,
            ),
            do_size_rollover: self.resolve(
                DO_SIZE_ROLLOVER,
                section,
                d.do_size_rollover,
                diagnostics,
            ),
            rollover_size: self.resolve(ROLLOVER_SIZE, section, d.rollover_size, diagnostics),
            log_level: self.resolve(LOG_LEVEL, section, d.log_level, diagnostics),
            log_file_level: self.resolve(LOG_FILE_LEVEL, section, d.log_file_level, diagnostics),
            enter_log_level: self.resolve(
                ENTER_LOG_LEVEL,
                section,
                d.enter_log_level,
                diagnostics,
            ),
            exit_log_level: self.resolve(EXIT_LOG_LEVEL, section, d.exit_log_level, diagnostics),
            do_enter_exit_logs: self.resolve(
                DO_ENTER_EXIT_LOGS,
                section,
                d.do_enter_exit_logs,
                diagnostics,
            ),
            prop_file_name,
        })
    }
}

impl std::fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySource").finish_non_exhaustive()
    }
}
