//! Command implementations for the mergeviz CLI.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{MovieConfig, RenderConfig};
use crate::error::Result;
use crate::infostream::event::Event;
use crate::infostream::timestamp::seconds_between;
use crate::movie::bounds::scan_bounds;
use crate::movie::{discover_log_files, load_log, make_movie};
use crate::segments::chart::render_chart;
use crate::segments::stats::SegmentStats;

/// Execute a CLI command.
pub fn execute_command(args: MergeVizArgs) -> Result<()> {
    match &args.command {
        Command::Movie(movie_args) => render_movie(movie_args, &args),
        Command::Events(events_args) => list_events(events_args, &args),
        Command::Segments(segments_args) => chart_segments(segments_args, &args),
    }
}

fn load_render_config(path: Option<&Path>, cli_args: &MergeVizArgs) -> Result<RenderConfig> {
    match path {
        Some(path) => {
            if cli_args.verbosity() > 1 {
                println!("Loading render configuration from: {}", path.display());
            }
            RenderConfig::from_file(path)
        }
        None => Ok(RenderConfig::default()),
    }
}

/// Find the log files that make up `log_file`, oldest first, and print them.
fn announce_log_files(log_file: &Path, cli_args: &MergeVizArgs) -> Result<Vec<PathBuf>> {
    let files = discover_log_files(log_file)?;
    if cli_args.verbosity() > 0 && cli_args.output_format == OutputFormat::Human {
        for file in &files {
            println!("Found {}", file.display());
        }
    }
    Ok(files)
}

fn display_names(files: &[PathBuf]) -> Vec<String> {
    files.iter().map(|f| f.display().to_string()).collect()
}

/// Render a movie.
fn render_movie(args: &MovieArgs, cli_args: &MergeVizArgs) -> Result<()> {
    let start_time = Instant::now();
    let log_files = announce_log_files(&args.log_file, cli_args)?;

    let config = MovieConfig::default()
        .with_time_format(args.timeformat.as_str())
        .with_frame_limit(args.limit)
        .with_render(load_render_config(args.config.as_deref(), cli_args)?);
    let encoder = args.encoder.build(args.encoder_bin.clone());

    let outcome = make_movie(
        &log_files,
        &args.output_file,
        &config,
        encoder.as_ref(),
        args.frames_dir.as_deref(),
    )?;
    let summary = outcome.summary;

    if cli_args.verbosity() > 0 && cli_args.output_format == OutputFormat::Human {
        println!(
            "Max segment count: {}, max segment size: {:.1} MB",
            summary.bounds.max_segment_count, summary.bounds.max_segment_size_mb
        );
        println!("{} events", summary.events);
    }

    output_result(
        "Movie rendered",
        &MovieResult {
            output: args.output_file.display().to_string(),
            encoder: encoder.name().to_string(),
            log_files: log_files.len(),
            events: summary.events,
            frames: summary.frames,
            merges: summary.merges,
            merged_mb: summary.merged_mb,
            max_segment_count: summary.bounds.max_segment_count,
            max_segment_size_mb: summary.bounds.max_segment_size_mb,
            truncated: summary.truncated,
            frames_dir: outcome.frames_dir.map(|dir| dir.display().to_string()),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Parse a log and report what it contains.
fn list_events(args: &EventsArgs, cli_args: &MergeVizArgs) -> Result<()> {
    let log_files = announce_log_files(&args.log_file, cli_args)?;
    let log = load_log(&log_files, &args.timeformat)?;
    let bounds = scan_bounds(&log.events);

    let mut distinct: HashSet<&str> = HashSet::new();
    for event in &log.events {
        match event {
            Event::IndexSnapshot { segments, .. } => {
                distinct.extend(segments.iter().map(|s| s.name.as_str()));
            }
            Event::MergeStarted { segments, .. } => {
                distinct.extend(segments.iter().map(String::as_str));
            }
        }
    }

    let span = log.time_span();
    let summary = EventsSummary {
        log_files: display_names(&log_files),
        snapshots: log.snapshot_count(),
        merges: log.merge_count(),
        distinct_segments: distinct.len(),
        max_segment_count: bounds.max_segment_count,
        max_segment_size_mb: bounds.max_segment_size_mb,
        first_event: span.map(|(first, _)| first.to_string()),
        last_event: span.map(|(_, last)| last.to_string()),
        span_secs: span
            .map(|(first, last)| seconds_between(first, last))
            .unwrap_or(0.0),
    };

    match cli_args.output_format {
        OutputFormat::Human => output_result("Log parsed", &summary, cli_args),
        OutputFormat::Json => output_result(
            "Log parsed",
            &EventsListing {
                summary,
                events: log.events,
            },
            cli_args,
        ),
    }
}

/// Chart a segment statistics file.
fn chart_segments(args: &SegmentsArgs, cli_args: &MergeVizArgs) -> Result<()> {
    let config = load_render_config(args.config.as_deref(), cli_args)?;
    let stats = SegmentStats::from_file(&args.stats_file)?;

    if let Some(output) = &args.output {
        let chart = render_chart(&stats, &config)?;
        chart.save_with_format(output, image::ImageFormat::Png)?;
    }

    let summary = stats.summary();
    output_result(
        "Segment statistics",
        &SegmentsResult {
            chart: args.output.as_ref().map(|p| p.display().to_string()),
            segments: summary.segments,
            live_docs: summary.live_docs,
            deleted_docs: summary.deleted_docs,
            deleted_ratio: summary.deleted_ratio,
            rows: summary.rows,
        },
        cli_args,
    )
}
