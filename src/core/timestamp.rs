//! Timestamp and date-tag formatting
//!
//! Log lines carry a fixed, sortable local timestamp and rotated files carry
//! the local date they belong to.

use chrono::{DateTime, Local, NaiveDate};
use std::time::SystemTime;

/// Timestamp written at the start of every log line: `2025-01-08 10:30:45`
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date tag embedded in rotated file names: `2025-01-08`
pub const DATE_TAG_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn format_line_timestamp(datetime: &DateTime<Local>) -> String {
    datetime.format(LINE_TIMESTAMP_FORMAT).to_string()
}

#[must_use]
pub fn format_date_tag(date: NaiveDate) -> String {
    date.format(DATE_TAG_FORMAT).to_string()
}

/// Whether `timestamp` falls before the start of the local day containing `now`
///
/// Compares calendar dates rather than building a midnight instant, so days
/// whose midnight is skipped by a DST change behave the same.
#[must_use]
pub fn is_before_start_of_day(timestamp: &DateTime<Local>, now: &DateTime<Local>) -> bool {
    timestamp.date_naive() < now.date_naive()
}

#[must_use]
pub fn local_from_system_time(time: SystemTime) -> DateTime<Local> {
    time.into()
}
