//! # mergeviz
//!
//! Visualizes how a search index merges its segments over time.
//!
//! ## Features
//!
//! - Parsing of merge policy infoStream logs, including rotated files
//! - One raster frame per index snapshot or merge, stitched into a movie by an
//!   external encoder
//! - Bar chart of live and deleted documents per segment
//!
//! ## Modules
//!
//! - [`infostream`]: log lines to snapshot and merge events
//! - [`render`]: frame rendering
//! - [`movie`]: the log-to-movie pipeline
//! - [`segments`]: segment statistics chart
//! - [`cli`]: command line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod infostream;
pub mod movie;
pub mod render;
pub mod segments;

pub mod prelude {
    pub use crate::config::{MovieConfig, RenderConfig};
    pub use crate::error::{MergeVizError, Result};
    pub use crate::infostream::{Event, EventStreamParser, ParsedLog, SegmentRecord};
    pub use crate::movie::{EncoderKind, MovieDriver, make_movie};
    pub use crate::segments::{SegmentStats, render_chart};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
