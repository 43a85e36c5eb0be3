//! Layout Module - Page layout and viewport geometry.
//!
//! Sections are stacked in a single flex column computed by
//! [Taffy](https://github.com/DioxusLabs/taffy). The result is indexed by
//! reveal target so the viewport observer can look up each section's rows.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::layout::{compute_page_layout, intersection_ratio, PageNode, Viewport};
//!
//! let layout = compute_page_layout(&[PageNode::new(0, 24), PageNode::new(1, 12)], 80, 1)?;
//! let ratio = intersection_ratio(&layout.bounds(1).unwrap(), &Viewport::new(10, 24));
//! ```

mod types;
mod taffy_bridge;

pub use types::*;
pub use taffy_bridge::{compute_page_layout, PageNode};
