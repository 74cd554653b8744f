//! Rendering and movie configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeVizError, Result};
use crate::infostream::timestamp::DEFAULT_TIME_FORMAT;

/// Largest accepted canvas width or height, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16384;

/// Canvas and axis settings shared by the movie frames and the segment chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Frames per second of the encoded movie.
    pub fps: u32,

    /// Offset added to every size before taking the logarithm, so that an
    /// empty segment still maps to a finite height.
    pub log_base_mb: f64,

    /// Sizes (MB) at which horizontal reference lines are drawn.
    pub reference_sizes_mb: Vec<f64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 24,
            log_base_mb: 10.0,
            reference_sizes_mb: vec![10.0, 50.0, 100.0, 500.0, 1024.0, 5.0 * 1024.0],
        }
    }
}

impl RenderConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < 240 || self.height < 120 {
            return Err(MergeVizError::invalid_argument(format!(
                "canvas {}x{} is too small",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return Err(MergeVizError::invalid_argument(format!(
                "canvas {}x{} exceeds {MAX_CANVAS_SIDE} pixels per side",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(MergeVizError::invalid_argument("fps must be positive"));
        }
        if self.log_base_mb.is_nan() || self.log_base_mb <= 0.0 {
            return Err(MergeVizError::invalid_argument(
                "log_base_mb must be positive",
            ));
        }
        Ok(())
    }

    /// Size in bytes of an RGB8 buffer covering the canvas.
    pub fn buffer_len(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| {
                MergeVizError::invalid_argument(format!(
                    "canvas {}x{} is too large",
                    self.width, self.height
                ))
            })
    }
}

/// Settings of one movie run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieConfig {
    /// chrono format of the line timestamps.
    pub time_format: String,

    /// Stop after this many frames.
    pub frame_limit: Option<usize>,

    pub render: RenderConfig,
}

impl Default for MovieConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            frame_limit: None,
            render: RenderConfig::default(),
        }
    }
}

impl MovieConfig {
    pub fn with_time_format<S: Into<String>>(mut self, format: S) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn with_frame_limit(mut self, limit: Option<usize>) -> Self {
        self.frame_limit = limit;
        self
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}
