//! Raster rendering of movie frames.
//!
//! Shapes are drawn with the plotters bitmap backend into an in-memory RGB
//! buffer; text is stamped on top with the built-in [`glyph`] font and the
//! result is handed out as an [`image::RgbImage`].

pub mod frame;
pub mod glyph;
pub mod palette;
pub mod scale;

pub use frame::{Frame, FrameInput, FrameRenderer};
pub use palette::ColorAssignment;
pub use scale::AxisBounds;
