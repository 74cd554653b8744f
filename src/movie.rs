//! Log-to-movie pipeline.
//!
//! - **bounds**: axis bounds pre-scan over all snapshots
//! - **driver**: per-event state and frame generation
//! - **frames**: numbered PNG frame directories
//! - **encoder**: external video encoders

pub mod bounds;
pub mod driver;
pub mod encoder;
pub mod frames;

use std::path::{Path, PathBuf};

use log::info;

use crate::config::MovieConfig;
use crate::error::{MergeVizError, Result};
use crate::infostream::parser::{EventStreamParser, ParsedLog};
use crate::infostream::rotation::find_log_files;
use crate::infostream::timestamp::TimestampParser;

pub use driver::{MovieDriver, MovieState, MovieSummary};
pub use encoder::{EncoderKind, FrameSequence, VideoEncoder};
pub use frames::{FrameDirectory, FrameSink};

/// The log file `base` and its rotated predecessors, oldest first.
pub fn discover_log_files<P: AsRef<Path>>(base: P) -> Result<Vec<PathBuf>> {
    let base = base.as_ref();
    if !base.is_file() {
        return Err(MergeVizError::invalid_argument(format!(
            "log file {} does not exist",
            base.display()
        )));
    }
    Ok(find_log_files(base))
}

/// Parse `files` in order as one continuous log.
pub fn load_log(files: &[PathBuf], time_format: &str) -> Result<ParsedLog> {
    info!("reading {} log file(s)", files.len());
    EventStreamParser::new(TimestampParser::new(time_format)).parse_files(files)
}

/// Result of [`make_movie`].
#[derive(Debug, Clone)]
pub struct MovieOutcome {
    pub summary: MovieSummary,
    /// Where the frames were written; `None` once a scratch directory is gone.
    pub frames_dir: Option<PathBuf>,
}

/// Render every frame of the log made of `log_files` and hand the sequence
/// to `encoder`.
///
/// Frames go to `frames_dir` when given, otherwise to a scratch directory
/// that is removed after encoding.
pub fn make_movie(
    log_files: &[PathBuf],
    output: &Path,
    config: &MovieConfig,
    encoder: &dyn VideoEncoder,
    frames_dir: Option<&Path>,
) -> Result<MovieOutcome> {
    config.render.validate()?;
    let log = load_log(log_files, &config.time_format)?;
    info!(
        "{} events: {} snapshots, {} merges",
        log.events.len(),
        log.snapshot_count(),
        log.merge_count()
    );

    let driver = MovieDriver::new(config, &log.events);
    let bounds = driver.bounds();
    info!(
        "max segment count {}, max segment size {:.1} MB",
        bounds.max_segment_count, bounds.max_segment_size_mb
    );

    let mut frames = match frames_dir {
        Some(dir) => FrameDirectory::keep(dir)?,
        None => FrameDirectory::scratch()?,
    };
    let summary = driver.run(&log, &mut frames)?;

    let sequence = FrameSequence {
        dir: frames.path().to_path_buf(),
        count: frames.count(),
        width: config.render.width,
        height: config.render.height,
        fps: config.render.fps,
    };
    encoder.encode(&sequence, output)?;

    Ok(MovieOutcome {
        summary,
        frames_dir: frames_dir.map(Path::to_path_buf),
    })
}
