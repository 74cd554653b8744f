//! Parsing of merge policy infoStream logs.
//!
//! - **record**: segment line extraction and full-size normalization
//! - **timestamp**: line timestamp prefixes
//! - **parser**: the snapshot/merge event state machine
//! - **rotation**: discovery of rotated log files
//!
//! # Example
//!
//! ```no_run
//! use mergeviz::infostream::parser::EventStreamParser;
//! use mergeviz::infostream::rotation::find_log_files;
//! use mergeviz::infostream::timestamp::TimestampParser;
//!
//! let files = find_log_files("/var/log/index/infostream.log");
//! let log = EventStreamParser::new(TimestampParser::default()).parse_files(&files)?;
//! println!("{} events", log.events.len());
//! # Ok::<(), mergeviz::error::MergeVizError>(())
//! ```

pub mod event;
pub mod parser;
pub mod record;
pub mod rotation;
pub mod timestamp;

pub use event::Event;
pub use parser::{EventStreamParser, ParsedLog};
pub use record::{SegmentRecord, SegmentSizes};
