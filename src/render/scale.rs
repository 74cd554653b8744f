//! Pixel geometry of a frame.

use serde::{Deserialize, Serialize};

/// Pixels left free below the bars and above the largest segment.
const MARGIN: f64 = 10.0;

/// Axis extents fixed for a whole movie so that columns and heights do not
/// jump from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    /// Number of segment columns.
    pub max_segment_count: usize,
    /// Size (MB) mapped to the top of the canvas.
    pub max_segment_size_mb: f64,
}

impl AxisBounds {
    pub fn new(max_segment_count: usize, max_segment_size_mb: f64) -> Self {
        Self {
            max_segment_count: max_segment_count.max(1),
            max_segment_size_mb,
        }
    }
}

/// Logarithmic size axis: `y = H - 10 - k * (ln(base + mb) - ln(base))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    height: f64,
    log_base_mb: f64,
    y_per_log: f64,
}

impl LogScale {
    pub fn new(height: u32, log_base_mb: f64, max_size_mb: f64) -> Self {
        let height = height as f64;
        let max_log = ((log_base_mb + max_size_mb).ln() - log_base_mb.ln()).max(f64::EPSILON);
        Self {
            height,
            log_base_mb,
            y_per_log: (height - 2.0 * MARGIN) / max_log,
        }
    }

    /// Vertical pixel position of the top of a bar of `size_mb`.
    pub fn y(&self, size_mb: f64) -> f64 {
        self.baseline() - self.y_per_log * ((self.log_base_mb + size_mb).ln() - self.log_base_mb.ln())
    }

    /// Vertical pixel position of the bottom of every bar.
    pub fn baseline(&self) -> f64 {
        self.height - MARGIN
    }
}

/// Equal-width segment columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    column_width: i32,
}

impl ColumnLayout {
    pub fn new(width: u32, columns: usize) -> Self {
        Self {
            column_width: (width as usize / columns.max(1)) as i32,
        }
    }

    pub fn column_width(&self) -> i32 {
        self.column_width
    }

    /// Left and right pixel edge of the bar in column `index`.
    pub fn span(&self, index: usize) -> (i32, i32) {
        let x0 = index as i32 * self.column_width + 1;
        (x0, x0 + self.column_width - 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_scale_endpoints() {
        let scale = LogScale::new(720, 10.0, 550.0);
        assert_eq!(scale.baseline(), 710.0);
        assert_eq!(scale.y(0.0), 710.0);
        assert!((scale.y(550.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_scale_is_monotonic() {
        let scale = LogScale::new(720, 10.0, 1050.0);
        let ys: Vec<f64> = [1.0, 10.0, 100.0, 1000.0].iter().map(|&mb| scale.y(mb)).collect();
        assert!(ys.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_columns() {
        let layout = ColumnLayout::new(1280, 12);
        assert_eq!(layout.column_width(), 106);
        assert_eq!(layout.span(0), (1, 105));
        assert_eq!(layout.span(2), (213, 317));
    }

    #[test]
    fn test_bounds_keep_one_column() {
        assert_eq!(AxisBounds::new(0, 50.0).max_segment_count, 1);
    }
}
