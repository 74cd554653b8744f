//! Turns infoStream lines into snapshot and merge events.
//!
//! Every merge search of the merge policy looks like
//!
//! ```text
//! <ts> TRACE TMP: findMerges: 3 segments
//! <ts> TRACE TMP:   seg=_0(8.1.0):C100 size=120.0 MB
//! <ts> TRACE TMP:   seg=_1(8.1.0):C90/10 size=80.5 MB
//! <ts> TRACE TMP:   allowedSegmentCount=10 vs count=3 ...
//! <ts> TRACE TMP:   add merge=_0(8.1.0):C100 _1(8.1.0):C90/10 size=200.5 MB ...
//! ```
//!
//! The segment lines between the begin and end markers form one
//! [`Event::IndexSnapshot`]; every `add merge=` line is one
//! [`Event::MergeStarted`].

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::infostream::event::Event;
use crate::infostream::record::{SegmentLine, SegmentRecord, SegmentSizes, segment_names};
use crate::infostream::timestamp::TimestampParser;

/// Marks the start of a merge search.
pub const BEGIN_MERGE_SEARCH: &str = ": findMerges: ";

/// Either of these marks the end of a merge search.
pub const END_MERGE_SEARCH: [&str; 2] = ["allowedSegmentCount=", "LMP:   level "];

/// Marks a merge picked by the merge policy.
pub const MERGE_SELECTED: &str = "   add merge=";

#[derive(Debug, Default)]
enum ParseState {
    #[default]
    Idle,
    Accumulating {
        timestamp: NaiveDateTime,
        segments: Vec<SegmentRecord>,
    },
}

/// Everything extracted from a set of log files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedLog {
    pub events: Vec<Event>,
    pub sizes: SegmentSizes,
}

impl ParsedLog {
    pub fn snapshot_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_snapshot()).count()
    }

    pub fn merge_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_merge()).count()
    }

    /// Timestamps of the first and last event.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.events.first()?.timestamp();
        let last = self.events.last()?.timestamp();
        Some((first, last))
    }
}

/// Single-pass state machine over infoStream lines.
///
/// The size memo survives file boundaries; a merge search left open at the end
/// of a file does not.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    timestamps: TimestampParser,
    sizes: SegmentSizes,
    events: Vec<Event>,
    state: ParseState,
}

impl EventStreamParser {
    pub fn new(timestamps: TimestampParser) -> Self {
        Self {
            timestamps,
            ..Default::default()
        }
    }

    /// Parse the given files in order, oldest first.
    pub fn parse_files<P: AsRef<Path>>(mut self, paths: &[P]) -> Result<ParsedLog> {
        for path in paths {
            self.parse_file(path.as_ref())?;
        }
        Ok(self.finish())
    }

    /// Parse one log file.
    pub fn parse_file(&mut self, path: &Path) -> Result<()> {
        debug!("parsing {}", path.display());
        let bytes = fs::read(path)?;
        self.parse_text(&String::from_utf8_lossy(&bytes))
    }

    /// Parse the full contents of one log file.
    pub fn parse_text(&mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            self.feed(line)?;
        }
        self.end_file();
        Ok(())
    }

    /// Feed a single line.
    pub fn feed(&mut self, line: &str) -> Result<()> {
        // Segment lines are checked in every state; outside a merge search
        // they are otherwise ignored.
        let segment = SegmentLine::parse(line)?;
        if let ParseState::Accumulating { segments, .. } = &mut self.state {
            if let Some(segment) = segment {
                segments.push(self.sizes.record(&segment));
                return Ok(());
            }
            if END_MERGE_SEARCH.iter().any(|marker| line.contains(marker)) {
                self.flush_snapshot();
                return Ok(());
            }
        }

        if let Some(pos) = line.find(MERGE_SELECTED) {
            let timestamp = self.timestamps.parse_line(line)?;
            let segments = segment_names(&line[pos + MERGE_SELECTED.len()..]);
            self.events.push(Event::MergeStarted {
                timestamp,
                segments,
            });
            return Ok(());
        }

        if line.contains(BEGIN_MERGE_SEARCH) {
            let timestamp = self.timestamps.parse_line(line)?;
            self.flush_snapshot();
            self.state = ParseState::Accumulating {
                timestamp,
                segments: Vec::new(),
            };
        }

        Ok(())
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Finish parsing and hand out the events and the size memo.
    pub fn finish(mut self) -> ParsedLog {
        self.end_file();
        ParsedLog {
            events: self.events,
            sizes: self.sizes,
        }
    }

    fn flush_snapshot(&mut self) {
        if let ParseState::Accumulating {
            timestamp,
            segments,
        } = std::mem::take(&mut self.state)
        {
            if !segments.is_empty() {
                self.events.push(Event::IndexSnapshot {
                    timestamp,
                    segments,
                });
            }
        }
    }

    fn end_file(&mut self) {
        if let ParseState::Accumulating { segments, .. } = std::mem::take(&mut self.state) {
            debug!(
                "dropping unterminated merge search with {} segments",
                segments.len()
            );
        }
    }
}
