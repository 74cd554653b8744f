//! Where rendered frames go.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use log::debug;
use tempfile::TempDir;

use crate::error::Result;

/// Prefix of the scratch directory holding the frames of one run.
pub const SCRATCH_PREFIX: &str = "mergeimages-";

/// Receives rendered frames in order.
pub trait FrameSink {
    fn push_frame(&mut self, image: &RgbImage) -> Result<()>;
}

/// A directory of sequentially numbered `%08d.png` frames.
///
/// A scratch directory is removed together with its contents when the value
/// is dropped; a user-supplied directory is kept.
#[derive(Debug)]
pub struct FrameDirectory {
    path: PathBuf,
    _scratch: Option<TempDir>,
    count: usize,
}

impl FrameDirectory {
    /// Create a fresh scratch directory under the system temp dir.
    pub fn scratch() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
        debug!("writing frames to scratch directory {}", dir.path().display());
        Ok(Self {
            path: dir.path().to_path_buf(),
            _scratch: Some(dir),
            count: 0,
        })
    }

    /// Use (and create if needed) a directory that outlives the run.
    pub fn keep<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;
        Ok(Self {
            path,
            _scratch: None,
            count: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frames written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Path of the frame with the given sequence number.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.path.join(format!("{index:08}.png"))
    }

    /// Write the next frame of the sequence.
    pub fn push(&mut self, image: &RgbImage) -> Result<PathBuf> {
        let path = self.frame_path(self.count);
        image.save_with_format(&path, image::ImageFormat::Png)?;
        self.count += 1;
        Ok(path)
    }
}

impl FrameSink for FrameDirectory {
    fn push_frame(&mut self, image: &RgbImage) -> Result<()> {
        self.push(image).map(|_| ())
    }
}

impl FrameSink for Vec<RgbImage> {
    fn push_frame(&mut self, image: &RgbImage) -> Result<()> {
        self.push(image.clone());
        Ok(())
    }
}
