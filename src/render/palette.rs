//! Merge colors.
//!
//! Every in-flight merge gets its own color so the segments it consumes can be
//! told apart on screen. A color is freed once none of its segments remain in
//! the latest snapshot.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{MergeVizError, Result};
use crate::infostream::record::SegmentRecord;

/// Colors handed out to merges, lowest index first.
pub const MERGE_PALETTE: [[u8; 3]; 13] = [
    [0xff, 0xcc, 0xff],
    [0xff, 0xff, 0x99],
    [0xcc, 0xff, 0x99],
    [0xff, 0x99, 0x00],
    [0x00, 0xcc, 0xff],
    [0x33, 0xff, 0xcc],
    [0x99, 0x99, 0xff],
    [0xfb, 0xff, 0x94],
    [0xcb, 0xff, 0x94],
    [0xfb, 0x99, 0x04],
    [0x0b, 0xcc, 0xf4],
    [0x3b, 0xff, 0xc4],
    [0x9b, 0x99, 0xf4],
];

/// Fill of segments that are not being merged.
pub const IDLE_SEGMENT: [u8; 3] = [0xdd, 0xdd, 0xdd];

/// Overlay of the deleted part of a segment.
pub const DELETED_OVERLAY: [u8; 3] = [0x80, 0x80, 0x80];

/// Horizontal reference lines.
pub const GRID_LINE: [u8; 3] = [0xcc, 0xcc, 0xcc];

pub const BLACK: [u8; 3] = [0x00, 0x00, 0x00];
pub const WHITE: [u8; 3] = [0xff, 0xff, 0xff];

/// Segment name to palette index, for segments of in-flight merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorAssignment {
    colors: HashMap<String, usize>,
}

impl ColorAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give all segments of a new merge the lowest palette color not held by
    /// another merge. Returns the chosen palette index, or `None` for a merge
    /// without segments.
    pub fn assign_merge<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<Option<usize>> {
        if segments.is_empty() {
            return Ok(None);
        }

        let in_use = self.in_use();
        let color = (0..MERGE_PALETTE.len())
            .find(|index| !in_use.contains(index))
            .ok_or(MergeVizError::PaletteExhausted(in_use.len()))?;

        for segment in segments {
            self.colors.insert(segment.as_ref().to_string(), color);
        }
        Ok(Some(color))
    }

    /// Drop every segment that is not part of the given snapshot.
    pub fn retain_alive(&mut self, segments: &[SegmentRecord]) {
        self.colors
            .retain(|name, _| segments.iter().any(|segment| &segment.name == name));
    }

    /// Copy of this assignment restricted to the given snapshot.
    pub fn pruned(&self, segments: &[SegmentRecord]) -> Self {
        let mut pruned = self.clone();
        pruned.retain_alive(segments);
        pruned
    }

    /// Palette index of a segment, if it is being merged.
    pub fn color_of(&self, segment: &str) -> Option<usize> {
        self.colors.get(segment).copied()
    }

    /// RGB fill of a segment, if it is being merged.
    pub fn rgb_of(&self, segment: &str) -> Option<[u8; 3]> {
        self.color_of(segment).map(|index| MERGE_PALETTE[index])
    }

    /// Palette indices currently held.
    pub fn in_use(&self) -> BTreeSet<usize> {
        self.colors.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str) -> SegmentRecord {
        SegmentRecord {
            name: name.to_string(),
            full_size_mb: 1.0,
            deleted_fraction: 0.0,
        }
    }

    #[test]
    fn test_merge_segments_share_lowest_free_color() {
        let mut colors = ColorAssignment::new();
        assert_eq!(colors.assign_merge(&["_1", "_2"]).unwrap(), Some(0));
        assert_eq!(colors.color_of("_1"), Some(0));
        assert_eq!(colors.color_of("_2"), Some(0));

        assert_eq!(colors.assign_merge(&["_3"]).unwrap(), Some(1));
        assert_eq!(colors.rgb_of("_3"), Some(MERGE_PALETTE[1]));
        assert_eq!(colors.color_of("_4"), None);
    }

    #[test]
    fn test_freed_color_is_reused() {
        let mut colors = ColorAssignment::new();
        colors.assign_merge(&["_1"]).unwrap();
        colors.assign_merge(&["_2"]).unwrap();

        colors.retain_alive(&[segment("_2"), segment("_9")]);
        assert_eq!(colors.color_of("_1"), None);
        assert_eq!(colors.len(), 1);

        assert_eq!(colors.assign_merge(&["_9"]).unwrap(), Some(0));
    }

    #[test]
    fn test_palette_exhaustion_fails() {
        let mut colors = ColorAssignment::new();
        for i in 0..MERGE_PALETTE.len() {
            colors.assign_merge(&[format!("_{i}")]).unwrap();
        }
        let err = colors.assign_merge(&["_x"]).unwrap_err();
        assert!(matches!(err, MergeVizError::PaletteExhausted(13)));
    }

    #[test]
    fn test_empty_merge_takes_no_color() {
        let mut colors = ColorAssignment::new();
        let none: [&str; 0] = [];
        assert_eq!(colors.assign_merge(&none).unwrap(), None);
        assert!(colors.is_empty());
    }

    #[test]
    fn test_pruned_leaves_original_untouched() {
        let mut colors = ColorAssignment::new();
        colors.assign_merge(&["_1", "_2"]).unwrap();
        let pruned = colors.pruned(&[segment("_2")]);
        assert_eq!(pruned.len(), 1);
        assert_eq!(colors.len(), 2);
    }
}
