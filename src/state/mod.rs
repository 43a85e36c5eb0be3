//! State Module - Runtime state for reveal sequencing
//!
//! - **Clock** - system and simulated time sources
//! - **Timers** - the UI loop's one-shot timer queue
//! - **Viewport** - threshold-crossing observer for page regions
//! - **Stagger** - fixed-spacing reveal schedules
//! - **Reveal** - per-section reveal state machine
//! - **Scroll** - page scroll offsets

pub mod clock;
pub mod timers;
pub mod viewport;
pub mod stagger;
pub mod reveal;
pub mod scroll;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reveal::{attach, attach_scoped, RevealHandle, SequenceState};
pub use stagger::StaggerHandle;
pub use timers::TimerId;
pub use viewport::{observe, refresh_viewport, ObserverHandle, ViewportEvent};
