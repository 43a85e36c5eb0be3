//! Page Pipeline
//!
//! Connects presets, layout and the reveal state to a running page.
//!
//! ```text
//! PagePreset → Page::mount → layout → sequencers → paint → terminal
//! ```

pub mod page;

pub use page::{MountedSection, Page};
