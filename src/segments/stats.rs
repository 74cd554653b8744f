//! Segment statistics as reported by the search server.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeVizError, Result};

/// Document counts of one segment. Other fields of the server response are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDocs {
    pub num_docs: u64,
    pub deleted_docs: u64,
}

impl SegmentDocs {
    pub fn total_docs(&self) -> u64 {
        self.num_docs + self.deleted_docs
    }

    pub fn deleted_ratio(&self) -> f64 {
        ratio(self.deleted_docs, self.total_docs())
    }
}

#[derive(Debug, Deserialize)]
struct StatsDocument {
    segments: serde_json::Map<String, serde_json::Value>,
}

/// Per-segment document counts in the order the segments appear in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentStats {
    segments: Vec<(String, SegmentDocs)>,
}

impl SegmentStats {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse `{"segments": {"<name>": {"num_docs": .., "deleted_docs": ..}}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: StatsDocument = serde_json::from_str(json)?;
        let mut segments = Vec::with_capacity(document.segments.len());
        for (name, value) in document.segments {
            let docs: SegmentDocs = serde_json::from_value(value).map_err(|e| {
                MergeVizError::invalid_argument(format!("segment {name}: {e}"))
            })?;
            segments.push((name, docs));
        }
        Ok(Self { segments })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentDocs)> {
        self.segments.iter().map(|(name, docs)| (name.as_str(), docs))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Largest live plus deleted count of any segment.
    pub fn max_total_docs(&self) -> u64 {
        self.segments
            .iter()
            .map(|(_, docs)| docs.total_docs())
            .max()
            .unwrap_or(0)
    }

    pub fn summary(&self) -> StatsSummary {
        let rows: Vec<SegmentRow> = self
            .iter()
            .map(|(name, docs)| SegmentRow {
                name: name.to_string(),
                num_docs: docs.num_docs,
                deleted_docs: docs.deleted_docs,
                deleted_ratio: docs.deleted_ratio(),
            })
            .collect();
        let live_docs = rows.iter().map(|row| row.num_docs).sum();
        let deleted_docs = rows.iter().map(|row| row.deleted_docs).sum();

        StatsSummary {
            segments: rows.len(),
            live_docs,
            deleted_docs,
            deleted_ratio: ratio(deleted_docs, live_docs + deleted_docs),
            rows,
        }
    }
}

/// One line of [`StatsSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub name: String,
    pub num_docs: u64,
    pub deleted_docs: u64,
    pub deleted_ratio: f64,
}

/// Totals over all segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub segments: usize,
    pub live_docs: u64,
    pub deleted_docs: u64,
    pub deleted_ratio: f64,
    pub rows: Vec<SegmentRow>,
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
