//! Axis bounds pre-scan.

use crate::infostream::event::Event;
use crate::render::scale::AxisBounds;

/// Spare columns to the right of the largest snapshot.
pub const EXTRA_COLUMNS: usize = 2;

/// Scan every snapshot for the largest segment count and segment size.
///
/// The size bound gets 10% headroom, is rounded up to a multiple of 100 MB and
/// raised by another 50 MB.
pub fn scan_bounds(events: &[Event]) -> AxisBounds {
    let mut max_count = 1;
    let mut max_size_mb: f64 = 0.0;

    for event in events {
        if let Event::IndexSnapshot { segments, .. } = event {
            max_count = max_count.max(segments.len());
            for segment in segments {
                max_size_mb = max_size_mb.max(segment.full_size_mb);
            }
        }
    }

    AxisBounds::new(
        max_count + EXTRA_COLUMNS,
        100.0 * (max_size_mb * 1.1 / 100.0).ceil() + 50.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infostream::record::SegmentRecord;
    use chrono::NaiveDate;

    fn snapshot(sizes: &[f64]) -> Event {
        Event::IndexSnapshot {
            timestamp: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            segments: sizes
                .iter()
                .enumerate()
                .map(|(i, &full_size_mb)| SegmentRecord {
                    name: format!("_{i}"),
                    full_size_mb,
                    deleted_fraction: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_bounds_over_all_snapshots() {
        let events = vec![
            snapshot(&[10.0, 20.0, 30.0]),
            Event::MergeStarted {
                timestamp: NaiveDate::from_ymd_opt(2020, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 1)
                    .unwrap(),
                segments: vec!["_0".into(); 9],
            },
            snapshot(&[420.0]),
        ];

        let bounds = scan_bounds(&events);
        assert_eq!(bounds.max_segment_count, 5);
        // 420 * 1.1 = 462 -> 500 -> 550
        assert_eq!(bounds.max_segment_size_mb, 550.0);
    }

    #[test]
    fn test_bounds_without_snapshots() {
        let bounds = scan_bounds(&[]);
        assert_eq!(bounds.max_segment_count, 3);
        assert_eq!(bounds.max_segment_size_mb, 50.0);
    }
}
