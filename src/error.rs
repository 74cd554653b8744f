//! Error types for mergeviz.
//!
//! Every fatal condition is represented by the [`MergeVizError`] enum. There is
//! no recovery anywhere in the pipeline: the first error aborts the run.
//!
//! # Examples
//!
//! ```
//! use mergeviz::error::{MergeVizError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MergeVizError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for mergeviz operations.
#[derive(Error, Debug)]
pub enum MergeVizError {
    /// I/O errors (reading logs, writing frames, spawning processes)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PNG encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Drawing backend errors
    #[error("Render error: {0}")]
    Render(String),

    /// A segment line whose deleted count exceeds its doc count
    #[error("Malformed segment line: {0}")]
    MalformedSegment(String),

    /// A line whose timestamp prefix is missing or does not parse
    #[error("Timestamp error: {0}")]
    Timestamp(String),

    /// Every merge color is held by an in-flight merge
    #[error("Resource exhausted: ran out of merge colors ({0} in use)")]
    PaletteExhausted(usize),

    /// The external video encoder could not be run
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for operations that may fail with MergeVizError.
pub type Result<T> = std::result::Result<T, MergeVizError>;

impl MergeVizError {
    /// Create a new render error.
    pub fn render<S: Into<String>>(msg: S) -> Self {
        MergeVizError::Render(msg.into())
    }

    /// Create a new malformed segment error.
    pub fn malformed_segment<S: Into<String>>(msg: S) -> Self {
        MergeVizError::MalformedSegment(msg.into())
    }

    /// Create a new timestamp error.
    pub fn timestamp<S: Into<String>>(msg: S) -> Self {
        MergeVizError::Timestamp(msg.into())
    }

    /// Create a new encoder error.
    pub fn encoder<S: Into<String>>(msg: S) -> Self {
        MergeVizError::Encoder(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MergeVizError::InvalidArgument(msg.into())
    }

    /// Whether the error stems from malformed log input.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            MergeVizError::MalformedSegment(_) | MergeVizError::Timestamp(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = MergeVizError::malformed_segment("docCount 1 delCount 2");
        assert_eq!(
            error.to_string(),
            "Malformed segment line: docCount 1 delCount 2"
        );
        assert!(error.is_malformed_input());

        let error = MergeVizError::PaletteExhausted(13);
        assert_eq!(
            error.to_string(),
            "Resource exhausted: ran out of merge colors (13 in use)"
        );
        assert!(!error.is_malformed_input());
    }

    #[test]
    fn test_helpers_build_typed_variants() {
        assert!(matches!(MergeVizError::render("x"), MergeVizError::Render(_)));
        assert!(matches!(MergeVizError::encoder("x"), MergeVizError::Encoder(_)));
        assert!(matches!(
            MergeVizError::invalid_argument("x"),
            MergeVizError::InvalidArgument(_)
        ));

        let error = MergeVizError::timestamp("no prefix");
        assert_eq!(error.to_string(), "Timestamp error: no prefix");
        assert!(error.is_malformed_input());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = MergeVizError::from(io_error);

        match error {
            MergeVizError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
