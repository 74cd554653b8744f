//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{MergeVizArgs, OutputFormat};
use crate::error::Result;
use crate::infostream::event::Event;
use crate::segments::stats::SegmentRow;

/// Result structure for movie rendering.
#[derive(Debug, Serialize, Deserialize)]
pub struct MovieResult {
    pub output: String,
    pub encoder: String,
    pub log_files: usize,
    pub events: usize,
    pub frames: usize,
    pub merges: usize,
    pub merged_mb: f64,
    pub max_segment_count: usize,
    pub max_segment_size_mb: f64,
    pub truncated: bool,
    pub frames_dir: Option<String>,
    pub duration_ms: u64,
}

/// Summary of a parsed log.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsSummary {
    pub log_files: Vec<String>,
    pub snapshots: usize,
    pub merges: usize,
    pub distinct_segments: usize,
    pub max_segment_count: usize,
    pub max_segment_size_mb: f64,
    pub first_event: Option<String>,
    pub last_event: Option<String>,
    pub span_secs: f64,
}

/// Summary together with every event, for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsListing {
    pub summary: EventsSummary,
    pub events: Vec<Event>,
}

/// Result structure for the segment chart.
#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentsResult {
    pub chart: Option<String>,
    pub segments: usize,
    pub live_docs: u64,
    pub deleted_docs: u64,
    pub deleted_ratio: f64,
    pub rows: Vec<SegmentRow>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &MergeVizArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &MergeVizArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in human_lines(&value, 0) {
        println!("{line}");
    }
    Ok(())
}

/// Flatten a JSON value into indented `key: value` lines. Arrays of objects
/// become one row per element.
fn human_lines(value: &serde_json::Value, indent: usize) -> Vec<String> {
    let spaces = "  ".repeat(indent);
    let mut lines = Vec::new();
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    serde_json::Value::Object(_) => {
                        lines.push(format!("{spaces}{key}:"));
                        lines.extend(human_lines(val, indent + 1));
                    }
                    serde_json::Value::Array(arr) if arr.iter().any(|v| v.is_object()) => {
                        lines.push(format!("{spaces}{key}:"));
                        for item in arr {
                            lines.push(format!("{spaces}  {}", format_row(item)));
                        }
                    }
                    _ => lines.push(format!("{spaces}{key}: {}", format_value(val))),
                }
            }
        }
        _ => lines.push(format!("{spaces}{}", format_value(value))),
    }
    lines
}

/// Format an object as a single `key=value` row.
fn format_row(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}={}", format_value(val)))
            .collect::<Vec<_>>()
            .join(" "),
        _ => format_value(value),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &MergeVizArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.2}"),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("test")), "test");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(0.126)), "0.13");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(null)), "-");
        assert_eq!(format_value(&json!([1, 2, 3])), "[1, 2, 3]");
    }

    #[test]
    fn test_human_lines_nest_and_tabulate() {
        let value = json!({
            "segments": 2,
            "bounds": {"max_segment_count": 4},
            "rows": [
                {"name": "_0", "num_docs": 10},
                {"name": "_1", "num_docs": 20}
            ]
        });

        let lines = human_lines(&value, 0);
        assert_eq!(
            lines,
            vec![
                "segments: 2",
                "bounds:",
                "  max_segment_count: 4",
                "rows:",
                "  name=_0 num_docs=10",
                "  name=_1 num_docs=20",
            ]
        );
    }
}
