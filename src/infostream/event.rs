//! Events extracted from an infoStream.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::infostream::record::SegmentRecord;

/// A point in the merge history of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The full set of segments seen by one merge search.
    IndexSnapshot {
        timestamp: NaiveDateTime,
        segments: Vec<SegmentRecord>,
    },
    /// Segments picked by the merge policy for one merge.
    MergeStarted {
        timestamp: NaiveDateTime,
        segments: Vec<String>,
    },
}

impl Event {
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Event::IndexSnapshot { timestamp, .. } | Event::MergeStarted { timestamp, .. } => {
                *timestamp
            }
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Event::IndexSnapshot { .. })
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, Event::MergeStarted { .. })
    }

    /// Number of segments carried by the event.
    pub fn segment_count(&self) -> usize {
        match self {
            Event::IndexSnapshot { segments, .. } => segments.len(),
            Event::MergeStarted { segments, .. } => segments.len(),
        }
    }
}
