//! Engine - Reveal target registry.
//!
//! Targets are NOT objects. A mounted section is an index; everything keyed by
//! that index (layout bounds, viewport observations, sequencers) hangs off the
//! registry and is torn down through its destroy callbacks:
//!
//! ```text
//! Index 0: hero       (y=0,  height=24, sequencer: Settled)
//! Index 1: about      (y=25, height=12, sequencer: Armed)
//! Index 2: experience (y=38, height=18, sequencer: Armed)
//! ```

mod registry;

pub use registry::*;
