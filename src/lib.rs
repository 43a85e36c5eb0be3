//! # spark-reveal
//!
//! Scroll-triggered, staggered reveal sequencing for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! Page sections are indices into the target registry, not objects. Each
//! mounted section gets a reveal sequencer that waits for the section to
//! cross its visibility threshold, then reveals the section and its items
//! one by one on a fixed stagger:
//!
//! ```text
//! PagePreset → Page::mount → taffy layout → viewport observer
//!                                               ↓
//!                      frame ← paint_page ← reveal sequencer ← stagger timers
//! ```
//!
//! Everything runs on the UI thread. Timers fire from [`Page::tick`] (or
//! [`state::timers::run_due_timers`]) and crossings are evaluated on every
//! scroll or resize.
//!
//! ## Modules
//!
//! - [`types`] - Thresholds, reveal configs, phases, cells
//! - [`engine`] - Target registry and destroy callbacks
//! - [`layout`] - Taffy page layout and viewport geometry
//! - [`state`] - Clock, timers, viewport observer, stagger, reveal, scroll
//! - [`config`] - RON page presets
//! - [`pipeline`] - Mounted pages
//! - [`renderer`] - Frame painting and diff rendering

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{PagePreset, RevealPreset, SectionPreset};
pub use error::{LayoutError, PageError};

pub use engine::{allocate_target, on_destroy, release_target, reset_registry};

pub use layout::{compute_page_layout, intersection_ratio, ComputedLayout, PageNode, Rect, Viewport};

pub use pipeline::{MountedSection, Page};

pub use renderer::{paint_page, DiffRenderer, FrameBuffer};

pub use state::{
    attach, attach_scoped, observe, refresh_viewport, Clock, ManualClock, ObserverHandle,
    RevealHandle, SequenceState, StaggerHandle, SystemClock, TimerId, ViewportEvent,
};
