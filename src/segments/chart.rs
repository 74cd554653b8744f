//! Stacked bar chart of live and deleted documents per segment.

use image::RgbImage;
use plotters::prelude::*;

use crate::config::RenderConfig;
use crate::error::{MergeVizError, Result};
use crate::render::frame::{render_error, rgb};
use crate::render::glyph::TextPainter;
use crate::render::palette::{BLACK, WHITE};
use crate::segments::stats::SegmentStats;

pub const LIVE_DOCS: [u8; 3] = [0x7f, 0x6d, 0x5f];
pub const DELETED_DOCS: [u8; 3] = [0x55, 0x7f, 0x2d];

const TEXT_SCALE: u32 = 2;
const TICKS: u32 = 5;
const MARGIN_LEFT: i32 = 80;
const MARGIN_RIGHT: i32 = 20;
const MARGIN_TOP: i32 = 30;
const LEGEND_WIDTH: i32 = 130;

/// Geometry of the plot area for a given set of segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
    /// Document count at the top of the y axis.
    pub y_max: u64,
    pub tick_step: u64,
    pub slot_width: f64,
}

impl ChartLayout {
    pub fn new(config: &RenderConfig, stats: &SegmentStats) -> Self {
        let longest_name = stats
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0) as i32;
        let pitch = ((5 + 1) * TEXT_SCALE) as i32;
        let label_room = (20 + longest_name * pitch).min(config.height as i32 / 3);

        let tick_step = nice_step(stats.max_total_docs() as f64 / (TICKS - 1) as f64);
        let left = MARGIN_LEFT;
        let right = config.width as i32 - MARGIN_RIGHT;
        Self {
            left,
            right,
            top: MARGIN_TOP,
            bottom: config.height as i32 - label_room,
            y_max: tick_step * (TICKS - 1) as u64,
            tick_step,
            slot_width: (right - left) as f64 / stats.len().max(1) as f64,
        }
    }

    /// Pixel row of a document count.
    pub fn y(&self, docs: u64) -> i32 {
        let height = (self.bottom - self.top) as f64;
        (self.bottom as f64 - docs as f64 / self.y_max as f64 * height).round() as i32
    }

    /// Horizontal extent of the bar in slot `index`.
    pub fn slot(&self, index: usize) -> (i32, i32) {
        let x0 = self.left as f64 + index as f64 * self.slot_width;
        (x0.round() as i32, (x0 + self.slot_width).round() as i32)
    }
}

/// Round up to 1, 2, 2.5 or 5 times a power of ten; never below 1. The 2.5
/// step only applies from 10 up so that steps stay integral.
fn nice_step(raw: f64) -> u64 {
    if raw <= 1.0 {
        return 1;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 && magnitude >= 10.0 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    (nice * magnitude).round() as u64
}

/// Draw the chart: live documents from the axis up, deleted documents stacked
/// on top, segment names under the bars.
pub fn render_chart(stats: &SegmentStats, config: &RenderConfig) -> Result<RgbImage> {
    config.validate()?;
    let (width, height) = (config.width, config.height);
    let layout = ChartLayout::new(config, stats);

    let mut buffer = vec![0u8; config.buffer_len()?];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&rgb(WHITE)).map_err(render_error)?;

        for (index, (_, docs)) in stats.iter().enumerate() {
            let (x0, x1) = layout.slot(index);
            let live_top = layout.y(docs.num_docs);
            let total_top = layout.y(docs.total_docs());
            draw_bar(&root, (x0, live_top), (x1, layout.bottom), LIVE_DOCS)?;
            if docs.deleted_docs > 0 {
                draw_bar(&root, (x0, total_top), (x1, live_top), DELETED_DOCS)?;
            }
        }

        let axis = rgb(BLACK).stroke_width(1);
        root.draw(&PathElement::new(
            vec![(layout.left, layout.top), (layout.left, layout.bottom)],
            axis,
        ))
        .map_err(render_error)?;
        root.draw(&PathElement::new(
            vec![(layout.left, layout.bottom), (layout.right, layout.bottom)],
            axis,
        ))
        .map_err(render_error)?;
        for tick in 0..TICKS {
            let y = layout.y(tick as u64 * layout.tick_step);
            root.draw(&PathElement::new(
                vec![(layout.left - 5, y), (layout.left, y)],
                axis,
            ))
            .map_err(render_error)?;
        }

        let legend_x = layout.right - LEGEND_WIDTH;
        for (row, color) in [DELETED_DOCS, LIVE_DOCS].into_iter().enumerate() {
            let y = layout.top + row as i32 * 20;
            root.draw(&Rectangle::new(
                [(legend_x, y), (legend_x + 24, y + 12)],
                rgb(color).filled(),
            ))
            .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
    }

    let mut painter = TextPainter::new(&mut buffer, width, height, TEXT_SCALE);
    for tick in 0..TICKS {
        let value = tick as u64 * layout.tick_step;
        let label = value.to_string();
        let x = layout.left - 8 - painter.text_width(&label) as i32;
        let y = layout.y(value) - painter.line_height() as i32 / 2;
        painter.draw_text(x, y, &label, BLACK);
    }

    let legend_x = layout.right - LEGEND_WIDTH;
    for (row, label) in ["deleted", "live"].into_iter().enumerate() {
        let y = layout.top + row as i32 * 20 + 1;
        painter.draw_text(legend_x + 32, y, label, BLACK);
    }

    let glyph_width = (3 * TEXT_SCALE) as i32;
    for (index, (name, _)) in stats.iter().enumerate() {
        let (x0, x1) = layout.slot(index);
        let x = (x0 + x1) / 2 - glyph_width / 2;
        painter.draw_vertical(x, layout.bottom + 8, name, BLACK);
    }

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| MergeVizError::render("chart buffer does not match canvas size"))
}

fn draw_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
    fill: [u8; 3],
) -> Result<()> {
    area.draw(&Rectangle::new([top_left, bottom_right], rgb(fill).filled()))
        .map_err(render_error)?;
    area.draw(&Rectangle::new(
        [top_left, bottom_right],
        rgb(WHITE).stroke_width(1),
    ))
    .map_err(render_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RenderConfig {
        RenderConfig {
            width: 640,
            height: 360,
            ..RenderConfig::default()
        }
    }

    fn pixel(image: &RgbImage, x: i32, y: i32) -> [u8; 3] {
        image.get_pixel(x as u32, y as u32).0
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.0), 1);
        assert_eq!(nice_step(0.75), 1);
        assert_eq!(nice_step(100.0), 100);
        assert_eq!(nice_step(101.0), 200);
        assert_eq!(nice_step(2500.0), 2500);
        assert_eq!(nice_step(2600.0), 5000);
        assert_eq!(nice_step(2.2), 5);
        assert_eq!(nice_step(7.0), 10);
    }

    #[test]
    fn test_stacked_bars() {
        let stats = SegmentStats::from_json(
            r#"{"segments": {
                "_0": {"num_docs": 300, "deleted_docs": 100},
                "_1": {"num_docs": 100, "deleted_docs": 0}
            }}"#,
        )
        .unwrap();
        let layout = ChartLayout::new(&config(), &stats);
        assert_eq!(layout.y_max, 400);
        assert_eq!(layout.slot(0), (80, 350));

        let image = render_chart(&stats, &config()).unwrap();
        assert_eq!(image.dimensions(), (640, 360));

        let (x0, x1) = layout.slot(0);
        let center = (x0 + x1) / 2;
        assert_eq!(pixel(&image, center, layout.y(150)), LIVE_DOCS);
        assert_eq!(pixel(&image, center, layout.y(350)), DELETED_DOCS);
        assert_eq!(pixel(&image, center, layout.top - 10), WHITE);

        let (x0, x1) = layout.slot(1);
        let center = (x0 + x1) / 2;
        assert_eq!(pixel(&image, center, layout.y(50)), LIVE_DOCS);
        assert_eq!(pixel(&image, center, layout.y(200)), WHITE);
    }

    #[test]
    fn test_oversized_canvas_is_an_error() {
        let stats = SegmentStats::from_json(r#"{"segments": {}}"#).unwrap();
        let config = RenderConfig {
            width: 40000,
            height: 40000,
            ..RenderConfig::default()
        };
        assert!(matches!(
            render_chart(&stats, &config),
            Err(MergeVizError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_stats_render_axes_only() {
        let stats = SegmentStats::from_json(r#"{"segments": {}}"#).unwrap();
        let image = render_chart(&stats, &config()).unwrap();
        let layout = ChartLayout::new(&config(), &stats);
        assert_eq!(pixel(&image, layout.left, layout.bottom - 10), BLACK);
        assert_eq!(pixel(&image, 300, layout.bottom - 10), WHITE);
    }
}
