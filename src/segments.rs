//! Segment statistics snapshots and their bar chart.
//!
//! Input is the per-shard segment listing of a search server, reduced to
//! `{"segments": {"<name>": {"num_docs": .., "deleted_docs": ..}}}`. Segments
//! keep the order they have in the file.

pub mod chart;
pub mod stats;

pub use chart::{ChartLayout, render_chart};
pub use stats::{SegmentDocs, SegmentRow, SegmentStats, StatsSummary};
