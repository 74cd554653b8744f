//! Command line argument parsing for the mergeviz CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infostream::timestamp::DEFAULT_TIME_FORMAT;
use crate::movie::encoder::EncoderKind;

/// mergeviz - visualize segment merges of a search index
#[derive(Parser, Debug, Clone)]
#[command(name = "mergeviz")]
#[command(about = "Turn merge policy infoStream logs into movies and charts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MergeVizArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MergeVizArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Log level for the crate as a whole.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity() {
            0 => LevelFilter::Error, // Quiet mode
            1 => LevelFilter::Warn,  // Default
            2 => LevelFilter::Info,  // Verbose
            _ => LevelFilter::Debug, // Very verbose (3+)
        }
    }

    /// Log level for per-event movie progress, which is shown unless quiet.
    pub fn progress_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            self.log_level().max(LevelFilter::Info)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render a merge movie from an infoStream log
    Movie(MovieArgs),

    /// Parse an infoStream log and report its events
    Events(EventsArgs),

    /// Chart live and deleted documents per segment
    Segments(SegmentsArgs),
}

/// Arguments for rendering a movie
#[derive(Parser, Debug, Clone)]
pub struct MovieArgs {
    /// infoStream log file; rotated files `<LOG_FILE>.1`, `.2`, ... are read too
    #[arg(value_name = "LOG_FILE")]
    pub log_file: PathBuf,

    /// Video file to write
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: PathBuf,

    /// chrono format of the line timestamps
    #[arg(long, default_value = DEFAULT_TIME_FORMAT)]
    pub timeformat: String,

    /// Video encoder
    #[arg(long, default_value = "mencoder")]
    pub encoder: EncoderKind,

    /// Encoder executable, if not the one on PATH
    #[arg(long, env = "MERGEVIZ_ENCODER_BIN")]
    pub encoder_bin: Option<PathBuf>,

    /// Keep the frames in this directory instead of a scratch directory
    #[arg(long, value_name = "DIR")]
    pub frames_dir: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Render configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for listing events
#[derive(Parser, Debug, Clone)]
pub struct EventsArgs {
    /// infoStream log file; rotated files are read too
    #[arg(value_name = "LOG_FILE")]
    pub log_file: PathBuf,

    /// chrono format of the line timestamps
    #[arg(long, default_value = DEFAULT_TIME_FORMAT)]
    pub timeformat: String,
}

/// Arguments for the segment chart
#[derive(Parser, Debug, Clone)]
pub struct SegmentsArgs {
    /// Segment statistics file (JSON)
    #[arg(value_name = "STATS_JSON")]
    pub stats_file: PathBuf,

    /// PNG file to write the chart to
    #[arg(short, long, value_name = "PNG")]
    pub output: Option<PathBuf>,

    /// Render configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_command() {
        let args = MergeVizArgs::try_parse_from([
            "mergeviz",
            "movie",
            "/var/log/infostream.log",
            "merges.avi",
            "--encoder",
            "ffmpeg",
            "--limit",
            "100",
            "--frames-dir",
            "/tmp/frames",
        ])
        .unwrap();

        if let Command::Movie(movie_args) = args.command {
            assert_eq!(movie_args.log_file, PathBuf::from("/var/log/infostream.log"));
            assert_eq!(movie_args.output_file, PathBuf::from("merges.avi"));
            assert_eq!(movie_args.encoder, EncoderKind::Ffmpeg);
            assert_eq!(movie_args.limit, Some(100));
            assert_eq!(movie_args.frames_dir, Some(PathBuf::from("/tmp/frames")));
            assert_eq!(movie_args.timeformat, DEFAULT_TIME_FORMAT);
        } else {
            panic!("Expected Movie command");
        }
    }

    #[test]
    fn test_movie_defaults() {
        let args =
            MergeVizArgs::try_parse_from(["mergeviz", "movie", "in.log", "out.avi"]).unwrap();

        if let Command::Movie(movie_args) = args.command {
            assert_eq!(movie_args.encoder, EncoderKind::Mencoder);
            assert_eq!(movie_args.limit, None);
            assert_eq!(movie_args.config, None);
        } else {
            panic!("Expected Movie command");
        }
    }

    #[test]
    fn test_events_command() {
        let args = MergeVizArgs::try_parse_from([
            "mergeviz",
            "events",
            "in.log",
            "--timeformat",
            "%d %b %H:%M:%S%.f",
        ])
        .unwrap();

        if let Command::Events(events_args) = args.command {
            assert_eq!(events_args.timeformat, "%d %b %H:%M:%S%.f");
        } else {
            panic!("Expected Events command");
        }
    }

    #[test]
    fn test_segments_command() {
        let args = MergeVizArgs::try_parse_from([
            "mergeviz",
            "segments",
            "shards.json",
            "-o",
            "chart.png",
        ])
        .unwrap();

        if let Command::Segments(segments_args) = args.command {
            assert_eq!(segments_args.stats_file, PathBuf::from("shards.json"));
            assert_eq!(segments_args.output, Some(PathBuf::from("chart.png")));
        } else {
            panic!("Expected Segments command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = MergeVizArgs::try_parse_from(["mergeviz", "events", "in.log"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Verbose flag
        let args = MergeVizArgs::try_parse_from(["mergeviz", "-v", "events", "in.log"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = MergeVizArgs::try_parse_from(["mergeviz", "-vvv", "events", "in.log"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        // Quiet flag
        let args =
            MergeVizArgs::try_parse_from(["mergeviz", "--quiet", "events", "in.log"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_progress_is_shown_by_default() {
        let args =
            MergeVizArgs::try_parse_from(["mergeviz", "movie", "in.log", "out.avi"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::Warn);
        assert_eq!(args.progress_level(), LevelFilter::Info);

        let args =
            MergeVizArgs::try_parse_from(["mergeviz", "-vvv", "movie", "in.log", "out.avi"])
                .unwrap();
        assert_eq!(args.log_level(), LevelFilter::Debug);
        assert_eq!(args.progress_level(), LevelFilter::Debug);

        let args = MergeVizArgs::try_parse_from(["mergeviz", "-q", "movie", "in.log", "out.avi"])
            .unwrap();
        assert_eq!(args.log_level(), LevelFilter::Error);
        assert_eq!(args.progress_level(), LevelFilter::Error);
    }

    #[test]
    fn test_output_format() {
        let args =
            MergeVizArgs::try_parse_from(["mergeviz", "--format", "json", "events", "in.log"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);

        assert!(
            MergeVizArgs::try_parse_from(["mergeviz", "--format", "yaml", "events", "in.log"])
                .is_err()
        );
    }
}
