//! Renderer - paint pages into frames and write them to the terminal.
//!
//! ```text
//! Page → paint_page → FrameBuffer → DiffRenderer → terminal
//! ```

mod buffer;
mod diff;
mod paint;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
pub use paint::{paint_page, INDENT, LEVEL_BAR_WIDTH};
