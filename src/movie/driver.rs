//! Walks the parsed events and writes one frame per interesting event.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::MovieConfig;
use crate::error::Result;
use crate::infostream::event::Event;
use crate::infostream::parser::ParsedLog;
use crate::infostream::record::{SegmentRecord, SegmentSizes};
use crate::infostream::timestamp::seconds_between;
use crate::movie::bounds::scan_bounds;
use crate::movie::frames::FrameSink;
use crate::render::frame::{FrameInput, FrameRenderer};
use crate::render::palette::ColorAssignment;
use crate::render::scale::AxisBounds;

/// Log target of the per-event progress lines.
pub const PROGRESS_TARGET: &str = "mergeviz::progress";

/// State carried from one event to the next.
#[derive(Debug, Clone, Default)]
pub struct MovieState {
    /// Latest `(full_size_mb, deleted_fraction)` of every segment seen so far.
    pub known_segments: HashMap<String, (f64, f64)>,
    pub colors: ColorAssignment,
    /// Cumulative merge cost in MB, never decreases.
    pub merged_mb: f64,
    /// Segment that most recently showed up for the first time.
    pub newest_segment: String,
}

impl MovieState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take in a snapshot: remember segment sizes and release the colors of
    /// segments that are gone.
    pub fn observe_snapshot(&mut self, segments: &[SegmentRecord]) {
        for segment in segments {
            if !self.known_segments.contains_key(&segment.name) {
                self.newest_segment = segment.name.clone();
            }
            self.known_segments.insert(
                segment.name.clone(),
                (segment.full_size_mb, segment.deleted_fraction),
            );
        }
        self.colors.retain_alive(segments);
    }

    /// Color a new merge and account for its cost.
    ///
    /// A merge costs `full * (2 - deleted_fraction)` per segment: everything
    /// live is read once and written once.
    pub fn start_merge(&mut self, segments: &[String], sizes: &SegmentSizes) -> Result<()> {
        if self.colors.assign_merge(segments)?.is_none() {
            return Ok(());
        }

        for name in segments {
            let cost = match self.known_segments.get(name) {
                Some(&(full_size_mb, deleted_fraction)) => full_size_mb * (2.0 - deleted_fraction),
                None => match sizes.get(name) {
                    Some(full_size_mb) => full_size_mb * 2.0,
                    None => {
                        warn!("merge names unknown segment {name}; not counted");
                        0.0
                    }
                },
            };
            self.merged_mb += cost;
        }
        Ok(())
    }
}

/// Outcome of a movie run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub events: usize,
    pub frames: usize,
    pub merges: usize,
    pub merged_mb: f64,
    pub bounds: AxisBounds,
    pub truncated: bool,
}

/// Two-pass frame generation over a parsed log.
pub struct MovieDriver {
    renderer: FrameRenderer,
    bounds: AxisBounds,
    frame_limit: Option<usize>,
}

impl MovieDriver {
    /// Pre-scan the events for the axis bounds and set up the renderer.
    pub fn new(config: &MovieConfig, events: &[Event]) -> Self {
        let bounds = scan_bounds(events);
        Self {
            renderer: FrameRenderer::new(config.render.clone(), bounds),
            bounds,
            frame_limit: config.frame_limit,
        }
    }

    pub fn bounds(&self) -> AxisBounds {
        self.bounds
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// Render the movie frames into `sink`.
    ///
    /// A snapshot immediately followed by a merge is not drawn: the merge
    /// frame shows the same segments a moment later.
    pub fn run<S: FrameSink + ?Sized>(&self, log: &ParsedLog, sink: &mut S) -> Result<MovieSummary> {
        let events = &log.events;
        let mut state = MovieState::new();
        let mut latest: Option<&[SegmentRecord]> = None;
        let mut first_event: Option<NaiveDateTime> = None;
        let mut first_frame: Option<NaiveDateTime> = None;
        let mut frames = 0;
        let mut merges = 0;
        let mut truncated = false;

        for (i, event) in events.iter().enumerate() {
            let timestamp = event.timestamp();
            let origin = *first_event.get_or_insert(timestamp);
            info!(
                target: PROGRESS_TARGET,
                "{}: {}/{}",
                seconds_between(origin, timestamp),
                i,
                events.len()
            );

            match event {
                Event::IndexSnapshot { segments, .. } => {
                    state.observe_snapshot(segments);
                    latest = Some(segments);
                    if matches!(events.get(i + 1), Some(Event::MergeStarted { .. })) {
                        continue;
                    }
                }
                Event::MergeStarted { segments, .. } => {
                    state.start_merge(segments, &log.sizes)?;
                    merges += 1;
                }
            }

            let Some(segments) = latest else {
                debug!("no snapshot yet at event {i}; nothing to draw");
                continue;
            };

            let start = *first_frame.get_or_insert(timestamp);
            let frame = self.renderer.render(&FrameInput {
                timestamp,
                start,
                segments,
                colors: &state.colors,
                newest_segment: &state.newest_segment,
                merged_mb: state.merged_mb,
            })?;
            state.colors = frame.colors;
            sink.push_frame(&frame.image)?;
            frames += 1;

            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                truncated = i + 1 < events.len();
                break;
            }
        }

        Ok(MovieSummary {
            events: events.len(),
            frames,
            merges,
            merged_mb: state.merged_mb,
            bounds: self.bounds,
            truncated,
        })
    }
}
