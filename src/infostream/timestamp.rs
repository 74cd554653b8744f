//! Timestamp prefixes of infoStream lines.
//!
//! Two layouts are recognized:
//!
//! ```text
//! 2019-07-07 12:54:12.554 TRACE [index][0] IW: ...
//! [2019-07-07 12:54:12.554][TRACE][o.e.i.e.E.IW] ...
//! ```
//!
//! i.e. the text before the first whitespace-delimited uppercase tag, or a
//! leading bracketed token.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use chrono::format::{Parsed, StrftimeItems};
use regex::Regex;

use crate::error::{MergeVizError, Result};

/// Default timestamp format, e.g. `2019-07-07 12:54:12.554`.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Year assumed when the format carries none, e.g. `07 Jul 12:54:12.554`.
pub const DEFAULT_YEAR: i64 = 1900;

static BRACKETED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]").expect("bracketed prefix pattern is valid"));

static TAGGED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?) +[A-Z]+ +").expect("tagged prefix pattern is valid"));

/// Parses line timestamps with a fixed chrono format.
#[derive(Debug, Clone)]
pub struct TimestampParser {
    format: String,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_FORMAT)
    }
}

impl TimestampParser {
    pub fn new<S: Into<String>>(format: S) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse the timestamp prefix of a log line.
    pub fn parse_line(&self, line: &str) -> Result<NaiveDateTime> {
        let prefix = timestamp_prefix(line).ok_or_else(|| {
            MergeVizError::timestamp(format!("no timestamp prefix in line {:?}", line.trim_end()))
        })?;
        self.parse(prefix)
    }

    /// Parse a bare timestamp.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime> {
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text.trim(), StrftimeItems::new(&self.format))
            .map_err(|e| {
                MergeVizError::timestamp(format!(
                    "cannot parse {text:?} with format {:?}: {e}",
                    self.format
                ))
            })?;

        if parsed.year().is_none()
            && parsed.year_div_100().is_none()
            && parsed.year_mod_100().is_none()
            && parsed.isoyear().is_none()
        {
            parsed
                .set_year(DEFAULT_YEAR)
                .map_err(|e| MergeVizError::timestamp(e.to_string()))?;
        }

        parsed.to_naive_datetime_with_offset(0).map_err(|e| {
            MergeVizError::timestamp(format!(
                "incomplete timestamp {text:?} for format {:?}: {e}",
                self.format
            ))
        })
    }
}

fn timestamp_prefix(line: &str) -> Option<&str> {
    if line.starts_with('[') {
        if let Some(caps) = BRACKETED_PREFIX.captures(line) {
            return caps.get(1).map(|m| m.as_str());
        }
    }
    TAGGED_PREFIX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Seconds elapsed between two timestamps, with millisecond resolution.
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    #[test]
    fn test_tagged_prefix() {
        let parser = TimestampParser::default();
        let ts = parser
            .parse_line("2019-07-07 12:54:12.554 TRACE [index][0] IW: findMerges: 3 segments")
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2019, 7, 7)
            .unwrap()
            .and_hms_milli_opt(12, 54, 12, 554)
            .unwrap();
        assert_eq!(ts, expected);
    }

    #[test]
    fn test_bracketed_prefix() {
        let parser = TimestampParser::new("%Y-%m-%dT%H:%M:%S,%3f");
        let ts = parser
            .parse_line("[2019-07-07T12:54:12,250][TRACE][o.e.i.e.E.TMP] [node] TMP: findMerges: 2 segments")
            .unwrap();
        assert_eq!(ts.second(), 12);
        assert_eq!(ts.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_yearless_format_defaults_year() {
        let parser = TimestampParser::new("%d %b %H:%M:%S%.f");
        let ts = parser
            .parse_line("07 Jul 12:54:12.554 DEBUG IW: now flush")
            .unwrap();
        assert_eq!(ts.year(), 1900);
        assert_eq!(ts.month(), 7);
        assert_eq!(ts.day(), 7);
    }

    #[test]
    fn test_missing_prefix_is_fatal() {
        let parser = TimestampParser::default();
        let err = parser.parse_line("   add merge=_1(8.1.0):C10").unwrap_err();
        assert!(matches!(err, MergeVizError::Timestamp(_)));
    }

    #[test]
    fn test_unparsable_prefix_is_fatal() {
        let parser = TimestampParser::default();
        let err = parser.parse_line("yesterday-ish TRACE IW: hello").unwrap_err();
        assert!(matches!(err, MergeVizError::Timestamp(_)));
    }

    #[test]
    fn test_seconds_between() {
        let parser = TimestampParser::default();
        let a = parser.parse("2019-07-07 12:54:12.500").unwrap();
        let b = parser.parse("2019-07-07 12:55:14.000").unwrap();
        assert_eq!(seconds_between(a, b), 61.5);
    }
}
