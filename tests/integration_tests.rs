//! Integration tests for the rolling logger
//!
//! These tests verify:
//! - Level gating across both sinks
//! - Configuration caching and refresh
//! - Size- and date-triggered rollover and sequence numbering
//! - Multi-line records
//! - Configuration from a property file

use chrono::Local;
use rolling_logger::appenders::{ConsoleAppender, ConsoleCapture};
use rolling_logger::core::diagnostics::{Diagnostic, DiagnosticSink, MemoryDiagnostics};
use rolling_logger::core::error::Result;
use rolling_logger::core::properties::PropertySource;
use rolling_logger::core::provider::ConfigSource;
use rolling_logger::core::timestamp::{format_date_tag, local_from_system_time};
use rolling_logger::{info, LogLevel, Logger, LoggerConfig};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn test_config(temp_dir: &TempDir) -> LoggerConfig {
    LoggerConfig::new()
        .with_log_dir(temp_dir.path().join("test-logs"))
        .with_file_name("application-test.log")
        .with_console_level(LogLevel::All)
        .with_file_level(LogLevel::All)
}

fn build_logger(config: LoggerConfig) -> (Logger, ConsoleCapture, Arc<MemoryDiagnostics>) {
    let (console, capture) = ConsoleAppender::captured();
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let logger = Logger::builder()
        .config(config)
        .console(console)
        .diagnostics(diagnostics.clone())
        .build()
        .expect("Failed to build logger");
    (logger, capture, diagnostics)
}

fn today_tag() -> String {
    format_date_tag(Local::now().date_naive())
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(String::from)
        .collect()
}

/// `<date> <time> <LEVEL> <tag> <message...>`
fn fields(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

#[test]
fn test_levels_below_both_thresholds_produce_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir)
        .with_console_level(LogLevel::Error)
        .with_file_level(LogLevel::Error);
    let active = config.active_path();
    let (logger, capture, _) = build_logger(config);

    logger.enter("quiet");
    info!(logger, "quiet", "info {}", 1);
    logger.trace("quiet", format_args!("trace"));
    logger.debug("quiet", format_args!("debug"));
    logger.warn("quiet", format_args!("warn"));
    logger.exit("quiet");

    assert!(capture.is_empty());
    assert!(!active.exists(), "No file should be created");
}

#[test]
fn test_entry_point_line_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);
    let active = config.active_path();
    let (logger, _, _) = build_logger(config);

    logger.enter("TestInfo");
    info!(logger, "TestInfo", "message with {} and {}", "m1", "m2");
    logger.exit("TestInfo");

    let lines = read_lines(&active);
    assert_eq!(lines.len(), 3);

    let enter = fields(&lines[0]);
    assert_eq!(enter[2], "INFO");
    assert_eq!(enter[3], "TestInfo");
    assert_eq!(enter[4], "[ENTER]");

    assert!(lines[1].ends_with("INFO TestInfo message with m1 and m2"));
    assert_eq!(fields(&lines[2])[4], "[EXIT]");

    // Sortable timestamp: YYYY-MM-DD HH:MM:SS
    let first = fields(&lines[0]);
    assert_eq!(first[0].len(), 10);
    assert_eq!(first[1].len(), 8);
}

#[test]
fn test_each_level_reaches_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir).with_console_level(LogLevel::None);
    let active = config.active_path();
    let (logger, capture, _) = build_logger(config);

    logger.trace("m", format_args!("t"));
    logger.debug("m", format_args!("d"));
    logger.info("m", format_args!("i"));
    logger.warn("m", format_args!("w"));
    logger.error("m", format_args!("e"));

    let levels: Vec<String> = read_lines(&active)
        .iter()
        .map(|l| fields(l)[2].to_string())
        .collect();
    assert_eq!(levels, vec!["TRACE", "DEBUG", "INFO", "WARN", "ERROR"]);
    assert!(capture.is_empty());
}

#[test]
fn test_multi_line_message_repeats_prefix() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);
    let active = config.active_path();
    let (logger, capture, _) = build_logger(config);

    logger.info("TestInfo", format_args!("a\nb"));

    let lines = read_lines(&active);
    assert_eq!(lines.len(), 2);
    let first = fields(&lines[0]);
    let second = fields(&lines[1]);
    assert_eq!(first[..4], second[..4]);
    assert_eq!(first[4], "a");
    assert_eq!(second[4], "b");

    assert_eq!(capture.lines(), lines);
}

#[test]
fn test_small_writes_land_in_one_file_in_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir).with_console_level(LogLevel::None);
    let active = config.active_path();
    let log_dir = config.log_file_dir.clone();
    let (logger, _, diagnostics) = build_logger(config);

    for i in 0..50 {
        logger.info("order", format_args!("Message {}", i));
    }

    let lines = read_lines(&active);
    assert_eq!(lines.len(), 50);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!("Message {}", i)));
    }
    assert_eq!(fs::read_dir(log_dir).unwrap().count(), 1);
    assert!(diagnostics.rotations().is_empty());
}

#[test]
fn test_size_rollover_sequence() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir)
        .with_console_level(LogLevel::None)
        .with_rollover_size(10);
    let active = config.active_path();
    let log_dir = config.log_file_dir.clone();
    let (logger, _, diagnostics) = build_logger(config);

    // Every line is longer than the 10 byte threshold
    for i in 1..=3 {
        info!(logger, "TestCheckFileRollover", "Testing info message {}", i);
    }

    let tag = today_tag();
    let first = log_dir.join(format!("application-test_{}_1.log", tag));
    let second = log_dir.join(format!("application-test_{}_2.log", tag));

    let first_lines = read_lines(&first);
    let second_lines = read_lines(&second);
    let active_lines = read_lines(&active);

    assert_eq!(first_lines.len(), 1);
    assert!(first_lines[0].ends_with("Testing info message 1"));
    assert_eq!(second_lines.len(), 1);
    assert!(second_lines[0].ends_with("Testing info message 2"));
    assert_eq!(active_lines.len(), 1);
    assert!(active_lines[0].ends_with("Testing info message 3"));

    let rotated: Vec<PathBuf> = diagnostics
        .rotations()
        .iter()
        .filter_map(|r| r.rotated_to().map(Path::to_path_buf))
        .collect();
    assert_eq!(rotated, vec![first, second]);
}

#[test]
fn test_size_rollover_disabled_keeps_single_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir)
        .with_console_level(LogLevel::None)
        .with_rollover_size(10)
        .with_size_rollover(false);
    let active = config.active_path();
    let (logger, _, _) = build_logger(config);

    for i in 0..5 {
        logger.info("t", format_args!("line {}", i));
    }

    assert_eq!(read_lines(&active).len(), 5);
}

#[test]
fn test_stale_file_rotated_with_yesterdays_date() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir).with_console_level(LogLevel::None);
    let active = config.active_path();
    fs::create_dir_all(&config.log_file_dir).unwrap();
    fs::write(&active, "2000-01-01 00:00:00 INFO old yesterday's line\n").unwrap();

    let yesterday = SystemTime::now() - Duration::from_secs(24 * 3600);
    File::options()
        .write(true)
        .open(&active)
        .unwrap()
        .set_modified(yesterday)
        .unwrap();
    let tag = format_date_tag(local_from_system_time(yesterday).date_naive());
    let rotated = config
        .log_file_dir
        .join(format!("application-test_{}_1.log", tag));

    let (logger, _, _) = build_logger(config);
    logger.info("today", format_args!("fresh line"));

    let old = read_lines(&rotated);
    assert_eq!(old, vec!["2000-01-01 00:00:00 INFO old yesterday's line"]);

    let fresh = read_lines(&active);
    assert_eq!(fresh.len(), 1);
    assert!(fresh[0].ends_with("INFO today fresh line"));
}

#[test]
fn test_sequence_continues_from_directory_contents() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir)
        .with_console_level(LogLevel::None)
        .with_rollover_size(10);
    let active = config.active_path();
    let log_dir = config.log_file_dir.clone();
    fs::create_dir_all(&log_dir).unwrap();

    // Left behind by an earlier process
    let tag = today_tag();
    for seq in 1..=3 {
        fs::write(
            log_dir.join(format!("application-test_{}_{}.log", tag, seq)),
            "earlier\n",
        )
        .unwrap();
    }
    fs::write(&active, "more than ten bytes of earlier output\n").unwrap();

    let (logger, _, _) = build_logger(config);
    logger.info("restart", format_args!("after restart"));

    let fourth = log_dir.join(format!("application-test_{}_4.log", tag));
    assert_eq!(read_lines(&fourth), vec!["more than ten bytes of earlier output"]);
    assert_eq!(read_lines(&active).len(), 1);
}

#[test]
fn test_abandoned_rotation_writes_to_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir)
        .with_console_level(LogLevel::None)
        .with_rollover_size(10);
    let active = config.active_path();
    let log_dir = config.log_file_dir.clone();
    fs::create_dir_all(&log_dir).unwrap();
    fs::write(&active, "more than ten bytes already\n").unwrap();
    fs::write(
        log_dir.join(format!("application-test_{}_copy.log", today_tag())),
        "",
    )
    .unwrap();

    let (logger, _, diagnostics) = build_logger(config);
    logger.info("t", format_args!("still written"));

    let lines = read_lines(&active);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("still written"));

    let rotations = diagnostics.rotations();
    assert_eq!(rotations.len(), 1);
    assert!(rotations[0].is_failed());
}

#[test]
fn test_cached_config_until_refresh() {
    struct SwitchableSource {
        quiet: Arc<parking_lot::Mutex<bool>>,
        base: LoggerConfig,
    }

    impl ConfigSource for SwitchableSource {
        fn load(&self, _: &dyn DiagnosticSink) -> Result<LoggerConfig> {
            let level = if *self.quiet.lock() {
                LogLevel::None
            } else {
                LogLevel::All
            };
            Ok(self.base.clone().with_console_level(level))
        }
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let quiet = Arc::new(parking_lot::Mutex::new(false));
    let (console, capture) = ConsoleAppender::captured();
    let logger = Logger::builder()
        .source(SwitchableSource {
            quiet: Arc::clone(&quiet),
            base: test_config(&temp_dir).with_file_level(LogLevel::None),
        })
        .console(console)
        .build()
        .unwrap();

    let before = logger.config().unwrap();
    *quiet.lock() = true;
    let still = logger.config().unwrap();
    assert!(Arc::ptr_eq(&before, &still));

    logger.info("t", format_args!("visible"));
    assert_eq!(capture.lines().len(), 1);

    let refreshed = logger.refresh_config().unwrap();
    assert_eq!(refreshed.log_level, LogLevel::None);

    logger.info("t", format_args!("hidden"));
    assert_eq!(capture.lines().len(), 1);
}

#[test]
fn test_uncached_config_sees_every_change() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let prop_file = temp_dir.path().join("klogger-properties.yml");
    let log_dir = temp_dir.path().join("prop-logs");
    let write_props = |level: &str| {
        fs::write(
            &prop_file,
            format!(
                "klogger:\n  LogFileDir: {}\n  LogFileName: prop.log\n  LogLevel: none\n  LogFileLevel: {}\n",
                log_dir.display(),
                level
            ),
        )
        .unwrap();
    };
    write_props("all");

    let prop_path = prop_file.to_string_lossy().into_owned();
    let source = PropertySource::with_lookup(move |name: &str| {
        if name == "KloggerPropFileName" {
            Ok(prop_path.clone())
        } else {
            Err(std::env::VarError::NotPresent)
        }
    });
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let logger = Logger::builder()
        .source(source)
        .use_cache(false)
        .diagnostics(diagnostics.clone())
        .build()
        .unwrap();

    logger.debug("props", format_args!("kept"));
    write_props("error");
    logger.debug("props", format_args!("dropped"));
    logger.error("props", format_args!("kept too"));

    let lines = read_lines(&log_dir.join("prop.log"));
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("DEBUG props kept"));
    assert!(lines[1].ends_with("ERROR props kept too"));
    assert!(diagnostics.events().is_empty());
}

#[test]
fn test_refresh_moves_file_to_new_directory() {
    struct Redirect {
        dir: Arc<parking_lot::Mutex<PathBuf>>,
    }

    impl ConfigSource for Redirect {
        fn load(&self, _: &dyn DiagnosticSink) -> Result<LoggerConfig> {
            Ok(LoggerConfig::new()
                .with_log_dir(self.dir.lock().clone())
                .with_console_level(LogLevel::None))
        }
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = Arc::new(parking_lot::Mutex::new(temp_dir.path().join("first")));
    let (logger, diagnostics) = {
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let logger = Logger::builder()
            .source(Redirect { dir: Arc::clone(&dir) })
            .diagnostics(diagnostics.clone())
            .build()
            .unwrap();
        (logger, diagnostics)
    };

    logger.info("t", format_args!("one"));
    *dir.lock() = temp_dir.path().join("second");
    logger.refresh_config().unwrap();
    logger.info("t", format_args!("two"));

    assert_eq!(read_lines(&temp_dir.path().join("first/application.log")).len(), 1);
    assert_eq!(read_lines(&temp_dir.path().join("second/application.log")).len(), 1);
    assert!(diagnostics
        .events()
        .iter()
        .all(|d| !matches!(d, Diagnostic::FileWriteFailed { .. })));
}

#[test]
fn test_exhausted_sequence_keeps_writing_active_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir)
        .with_console_level(LogLevel::None)
        .with_rollover_size(10);
    let active = config.active_path();
    let log_dir = config.log_file_dir.clone();
    fs::create_dir_all(&log_dir).unwrap();
    fs::write(&active, "more than ten bytes already\n").unwrap();
    let last = log_dir.join(format!("application-test_{}_{}.log", today_tag(), u32::MAX));
    fs::write(&last, "last rotation\n").unwrap();

    let (logger, _, diagnostics) = build_logger(config);
    logger.info("t", format_args!("after exhaustion"));

    let lines = read_lines(&active);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("after exhaustion"));
    assert_eq!(read_lines(&last), vec!["last rotation"]);

    let rotations = diagnostics.rotations();
    assert_eq!(rotations.len(), 1);
    assert!(rotations[0].is_failed());
}
