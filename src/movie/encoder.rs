//! Hand-off of the frame sequence to an external video encoder.
//!
//! The movie driver only produces numbered PNG files; turning them into a
//! video is left to whatever command-line encoder is installed. The encoder's
//! exit status is logged but not treated as an error: a failed encode shows up
//! as a missing or broken output file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{MergeVizError, Result};

/// A finished sequence of `%08d.png` frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSequence {
    pub dir: PathBuf,
    pub count: usize,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Stitches a frame sequence into a video file.
pub trait VideoEncoder {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    fn encode(&self, frames: &FrameSequence, output: &Path) -> Result<()>;
}

/// Encoder selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    Mencoder,
    Ffmpeg,
    None,
}

impl EncoderKind {
    /// Build the encoder, optionally overriding the executable.
    pub fn build(self, binary: Option<PathBuf>) -> Box<dyn VideoEncoder> {
        match self {
            EncoderKind::Mencoder => Box::new(CommandEncoder::mencoder(binary)),
            EncoderKind::Ffmpeg => Box::new(CommandEncoder::ffmpeg(binary)),
            EncoderKind::None => Box::new(NoEncoder),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandFlavor {
    Mencoder,
    Ffmpeg,
}

/// Runs a command-line encoder and waits for it.
#[derive(Debug, Clone)]
pub struct CommandEncoder {
    binary: PathBuf,
    flavor: CommandFlavor,
}

impl CommandEncoder {
    pub fn mencoder(binary: Option<PathBuf>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| PathBuf::from("mencoder")),
            flavor: CommandFlavor::Mencoder,
        }
    }

    pub fn ffmpeg(binary: Option<PathBuf>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| PathBuf::from("ffmpeg")),
            flavor: CommandFlavor::Ffmpeg,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments passed to the encoder binary.
    pub fn args(&self, frames: &FrameSequence, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match self.flavor {
            CommandFlavor::Mencoder => {
                let mut input = OsString::from("mf://");
                input.push(frames.dir.join("*.png"));
                args.push(input);
                args.push("-mf".into());
                args.push(
                    format!(
                        "type=png:w={}:h={}:fps={}",
                        frames.width, frames.height, frames.fps
                    )
                    .into(),
                );
                for arg in ["-ovc", "lavc", "-lavcopts", "vcodec=mjpeg", "-oac", "copy", "-o"] {
                    args.push(arg.into());
                }
            }
            CommandFlavor::Ffmpeg => {
                for arg in ["-hide_banner", "-loglevel", "error", "-y", "-framerate"] {
                    args.push(arg.into());
                }
                args.push(frames.fps.to_string().into());
                args.push("-i".into());
                args.push(frames.dir.join("%08d.png").into_os_string());
                args.push("-s".into());
                args.push(format!("{}x{}", frames.width, frames.height).into());
                for arg in ["-c:v", "mjpeg", "-q:v", "3"] {
                    args.push(arg.into());
                }
            }
        }
        args.push(output.as_os_str().to_os_string());
        args
    }
}

impl VideoEncoder for CommandEncoder {
    fn name(&self) -> &str {
        match self.flavor {
            CommandFlavor::Mencoder => "mencoder",
            CommandFlavor::Ffmpeg => "ffmpeg",
        }
    }

    fn encode(&self, frames: &FrameSequence, output: &Path) -> Result<()> {
        if frames.count == 0 {
            warn!("no frames rendered; skipping {}", self.name());
            return Ok(());
        }

        info!(
            "encoding {} frames ({}x{} @ {}fps) with {}",
            frames.count,
            frames.width,
            frames.height,
            frames.fps,
            self.binary.display()
        );

        let status = Command::new(&self.binary)
            .args(self.args(frames, output))
            .status()
            .map_err(|e| {
                MergeVizError::encoder(format!("failed to run {}: {e}", self.binary.display()))
            })?;

        if !status.success() {
            warn!(
                "{} exited with {status}; {} may be missing or incomplete",
                self.name(),
                output.display()
            );
        }
        Ok(())
    }
}

/// Leaves the frames where they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEncoder;

impl VideoEncoder for NoEncoder {
    fn name(&self) -> &str {
        "none"
    }

    fn encode(&self, frames: &FrameSequence, _output: &Path) -> Result<()> {
        info!(
            "skipping video encoding; {} frames in {}",
            frames.count,
            frames.dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(count: usize) -> FrameSequence {
        FrameSequence {
            dir: PathBuf::from("/tmp/mergeimages-x"),
            count,
            width: 1280,
            height: 720,
            fps: 24,
        }
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_mencoder_args() {
        let encoder = CommandEncoder::mencoder(None);
        let args = strings(encoder.args(&sequence(3), Path::new("out.avi")));
        assert_eq!(
            args,
            vec![
                "mf:///tmp/mergeimages-x/*.png",
                "-mf",
                "type=png:w=1280:h=720:fps=24",
                "-ovc",
                "lavc",
                "-lavcopts",
                "vcodec=mjpeg",
                "-oac",
                "copy",
                "-o",
                "out.avi",
            ]
        );
        assert_eq!(encoder.binary(), Path::new("mencoder"));
    }

    #[test]
    fn test_ffmpeg_args() {
        let encoder = CommandEncoder::ffmpeg(Some(PathBuf::from("/opt/bin/ffmpeg")));
        let args = strings(encoder.args(&sequence(3), Path::new("out.avi")));
        assert_eq!(args[5], "24");
        assert_eq!(args[7], "/tmp/mergeimages-x/%08d.png");
        assert_eq!(args.last().unwrap(), "out.avi");
        assert_eq!(encoder.binary(), Path::new("/opt/bin/ffmpeg"));
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let encoder = CommandEncoder::ffmpeg(Some(PathBuf::from("/nonexistent/encoder-binary")));
        let err = encoder
            .encode(&sequence(1), Path::new("/nonexistent/out.avi"))
            .unwrap_err();
        assert!(matches!(err, MergeVizError::Encoder(_)));
    }

    #[test]
    fn test_empty_sequence_is_skipped() {
        let encoder = CommandEncoder::ffmpeg(Some(PathBuf::from("/nonexistent/encoder-binary")));
        assert!(encoder.encode(&sequence(0), Path::new("out.avi")).is_ok());
        assert!(NoEncoder.encode(&sequence(5), Path::new("out.avi")).is_ok());
    }

    #[test]
    fn test_kind_builds_matching_encoder() {
        assert_eq!(EncoderKind::Mencoder.build(None).name(), "mencoder");
        assert_eq!(EncoderKind::Ffmpeg.build(None).name(), "ffmpeg");
        assert_eq!(EncoderKind::None.build(None).name(), "none");
    }
}
