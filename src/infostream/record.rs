//! Segment lines of a merge policy's infoStream.
//!
//! A merge policy dumps the segments it considers on every merge search, one
//! per line, e.g.
//!
//! ```text
//! TMP:   seg=_a(8.1.0):C1000/250 [diagnostics=...] size=12.345 MB [floored]
//! ```
//!
//! The reported size only covers live documents. [`SegmentSizes`] turns it into
//! an estimate of the full segment size on first sighting and freezes it.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MergeVizError, Result};

/// Size used when a segment is first seen with every document deleted.
pub const DEGENERATE_FULL_SIZE_MB: f64 = 0.1;

static SEGMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"seg=\*?(_.*?)\(.*?\):[cC]v?([0-9]+)(/[0-9]+)? .*?size=([0-9.]+) MB")
        .expect("segment line pattern is valid")
});

static SEGMENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*?(_.*?)\(.*?\):[cC]v?([0-9]+)(/[0-9]+)?")
        .expect("segment name pattern is valid")
});

/// One segment as seen in a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Segment name, e.g. `_a`.
    pub name: String,
    /// Estimated size in MB as if nothing were deleted.
    pub full_size_mb: f64,
    /// Share of the segment's documents that are deleted, in `[0, 1]`.
    pub deleted_fraction: f64,
}

impl SegmentRecord {
    /// Estimated size of the live documents.
    pub fn live_size_mb(&self) -> f64 {
        self.full_size_mb * (1.0 - self.deleted_fraction)
    }
}

/// Raw fields of a segment line before size normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLine {
    pub name: String,
    pub doc_count: u64,
    pub deleted_count: u64,
    /// Size as reported by the log, covering live documents only.
    pub reported_size_mb: f64,
}

impl SegmentLine {
    /// Extract a segment line, or `None` if the line does not describe one.
    ///
    /// A deleted count larger than the doc count is malformed input and fails.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let Some(start) = line.find("seg=") else {
            return Ok(None);
        };
        let Some(caps) = SEGMENT_LINE.captures(&line[start..]) else {
            return Ok(None);
        };

        let name = caps[1].to_string();
        let doc_count = parse_count(&caps[2], line)?;
        let deleted_count = match caps.get(3) {
            Some(m) => parse_count(&m.as_str()[1..], line)?,
            None => 0,
        };
        let reported_size_mb: f64 = caps[4].parse().map_err(|_| {
            MergeVizError::malformed_segment(format!("bad size {:?} in line {line:?}", &caps[4]))
        })?;

        if deleted_count > doc_count {
            return Err(MergeVizError::malformed_segment(format!(
                "docCount {doc_count} delCount {deleted_count} line {line:?}"
            )));
        }

        Ok(Some(SegmentLine {
            name,
            doc_count,
            deleted_count,
            reported_size_mb,
        }))
    }

    /// Deleted documents as a share of all documents.
    pub fn deleted_fraction(&self) -> f64 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.deleted_count as f64 / self.doc_count as f64
        }
    }
}

fn parse_count(digits: &str, line: &str) -> Result<u64> {
    digits.parse().map_err(|_| {
        MergeVizError::malformed_segment(format!("bad count {digits:?} in line {line:?}"))
    })
}

/// Segment names referenced on a merge selection line, in line order.
pub fn segment_names(text: &str) -> Vec<String> {
    SEGMENT_NAME
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Full segment sizes, computed once per segment name and then frozen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentSizes {
    full_size_mb: HashMap<String, f64>,
}

impl SegmentSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a segment line into a record, memoizing its full size.
    pub fn record(&mut self, line: &SegmentLine) -> SegmentRecord {
        let full_size_mb = *self
            .full_size_mb
            .entry(line.name.clone())
            .or_insert_with(|| estimate_full_size(line));

        SegmentRecord {
            name: line.name.clone(),
            full_size_mb,
            deleted_fraction: line.deleted_fraction(),
        }
    }

    /// Memoized full size of a segment, if it was ever seen.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.full_size_mb.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.full_size_mb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full_size_mb.is_empty()
    }
}

fn estimate_full_size(line: &SegmentLine) -> f64 {
    if line.deleted_count == 0 {
        return line.reported_size_mb;
    }

    let ratio = line.deleted_fraction();
    if ratio < 1.0 {
        line.reported_size_mb / (1.0 - ratio)
    } else {
        warn!(
            "segment {} is fully deleted ({} of {} docs); guessing {} MB",
            line.name, line.deleted_count, line.doc_count, DEGENERATE_FULL_SIZE_MB
        );
        DEGENERATE_FULL_SIZE_MB
    }
}
