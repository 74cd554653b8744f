//! Rendering of one movie frame.
//!
//! Each segment of the current snapshot is a bar in its own column. Bar
//! height is logarithmic in the full segment size; the top part of a bar is
//! shaded in proportion to its deleted documents. Segments of in-flight merges
//! are filled with their merge color, everything else is gray. A text block on
//! the right reports elapsed time and the running totals.

use chrono::NaiveDateTime;
use image::RgbImage;
use plotters::prelude::*;

use crate::config::RenderConfig;
use crate::error::{MergeVizError, Result};
use crate::infostream::record::SegmentRecord;
use crate::infostream::timestamp::seconds_between;
use crate::render::glyph::TextPainter;
use crate::render::palette::{
    BLACK, ColorAssignment, DELETED_OVERLAY, GRID_LINE, IDLE_SEGMENT, WHITE,
};
use crate::render::scale::{AxisBounds, ColumnLayout, LogScale};

const TEXT_SCALE: u32 = 2;
const TEXT_LINE_PITCH: i32 = 20;

/// Everything a frame shows.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub timestamp: NaiveDateTime,
    /// Timestamp of the first frame of the movie.
    pub start: NaiveDateTime,
    pub segments: &'a [SegmentRecord],
    pub colors: &'a ColorAssignment,
    /// Most recently appeared segment.
    pub newest_segment: &'a str,
    /// Cumulative merge cost so far.
    pub merged_mb: f64,
}

/// A rendered frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
    /// The input colors restricted to the segments of this frame.
    pub colors: ColorAssignment,
    pub live_mb: f64,
    pub merging_mb: f64,
}

/// Renders frames with fixed geometry.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    config: RenderConfig,
    scale: LogScale,
    columns: ColumnLayout,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig, bounds: AxisBounds) -> Self {
        let scale = LogScale::new(config.height, config.log_base_mb, bounds.max_segment_size_mb);
        let columns = ColumnLayout::new(config.width, bounds.max_segment_count);
        Self {
            config,
            scale,
            columns,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render(&self, input: &FrameInput<'_>) -> Result<Frame> {
        let (width, height) = (self.config.width, self.config.height);
        let colors = input.colors.pruned(input.segments);

        let mut live_mb = 0.0;
        let mut merging_mb = 0.0;
        for segment in input.segments {
            live_mb += segment.live_size_mb();
            if colors.color_of(&segment.name).is_some() {
                merging_mb += segment.full_size_mb;
            }
        }

        let mut buffer = vec![0u8; self.config.buffer_len()?];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&rgb(WHITE)).map_err(render_error)?;

            for &size_mb in &self.config.reference_sizes_mb {
                let y = self.scale.y(size_mb).round() as i32;
                root.draw(&PathElement::new(
                    vec![(0, y), (width as i32, y)],
                    rgb(GRID_LINE).stroke_width(1),
                ))
                .map_err(render_error)?;
            }

            let y1 = self.scale.baseline().round() as i32;
            for (index, segment) in input.segments.iter().enumerate() {
                let (x0, x1) = self.columns.span(index);
                let top = self.scale.y(segment.full_size_mb);
                let y0 = top.round() as i32;
                let fill = colors.rgb_of(&segment.name).unwrap_or(IDLE_SEGMENT);
                draw_box(&root, (x0, y0), (x1, y1), fill)?;

                if segment.deleted_fraction > 0.0 {
                    let y2 = (top + (self.scale.baseline() - top) * segment.deleted_fraction)
                        .round() as i32;
                    draw_box(&root, (x0, y0), (x1, y2), DELETED_OVERLAY)?;
                }
            }

            root.present().map_err(render_error)?;
        }

        let mut painter = TextPainter::new(&mut buffer, width, height, TEXT_SCALE);
        for &size_mb in &self.config.reference_sizes_mb {
            let y = self.scale.y(size_mb).round() as i32;
            painter.draw_text(width as i32 - 80, y - 20, &reference_label(size_mb), BLACK);
        }

        let base_x = width as i32 - 220;
        // Anchored just below the 500 MB line, kept on canvas for small indexes.
        let base_y = ((self.scale.y(500.0) + 15.0).round() as i32).max(20);
        let lines = [
            format!(
                "{} sec",
                seconds_between(input.start, input.timestamp) as i64
            ),
            format_total(live_mb),
            format!("{} segs; {}", input.segments.len(), input.newest_segment),
            format_merging(merging_mb),
            format_merged(input.merged_mb),
        ];
        for (row, line) in lines.iter().enumerate() {
            painter.draw_text(base_x, base_y + row as i32 * TEXT_LINE_PITCH, line, BLACK);
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| MergeVizError::render("frame buffer does not match canvas size"))?;

        Ok(Frame {
            image,
            colors,
            live_mb,
            merging_mb,
        })
    }
}

fn draw_box<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
    fill: [u8; 3],
) -> Result<()> {
    area.draw(&Rectangle::new([top_left, bottom_right], rgb(fill).filled()))
        .map_err(render_error)?;
    area.draw(&Rectangle::new(
        [top_left, bottom_right],
        rgb(BLACK).stroke_width(1),
    ))
    .map_err(render_error)?;
    Ok(())
}

pub(crate) fn rgb(color: [u8; 3]) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

pub(crate) fn render_error<E: std::fmt::Debug>(err: E) -> MergeVizError {
    MergeVizError::render(format!("{err:?}"))
}

fn reference_label(size_mb: f64) -> String {
    if size_mb >= 1024.0 {
        format!("{} GB", (size_mb / 1024.0) as i64)
    } else {
        format!("{} MB", size_mb as i64)
    }
}

/// Total live size, e.g. ` 2.5 MB` or `3.20 GB`.
pub fn format_total(mb: f64) -> String {
    if mb < 1024.0 {
        format!("{mb:4.1} MB")
    } else {
        format!("{:4.2} GB", mb / 1024.0)
    }
}

/// Size of the running merges, e.g. `12.5 MB merging`.
pub fn format_merging(mb: f64) -> String {
    if mb < 1024.0 {
        format!("{mb:.1} MB merging")
    } else {
        format!("{:.2} GB merging", mb / 1024.0)
    }
}

/// Cumulative merge cost, e.g. `1.50 GB merged`.
pub fn format_merged(mb: f64) -> String {
    if mb >= 1024.0 {
        format!("{:4.2} GB merged", mb / 1024.0)
    } else {
        format!("{mb:4.1} MB merged")
    }
}
