//! Viewport Observer - boundary-crossing events for page regions.
//!
//! Each observation watches one target against one threshold. After every
//! scroll, resize or relayout the page calls [`refresh_viewport`], which
//! re-measures every observed target and emits an event only when a target
//! crosses its threshold. Every observation starts out "not intersecting",
//! so a region that never reaches its threshold never emits.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::state::viewport;
//!
//! let handle = viewport::observe(section, Threshold::SECTION, |event| {
//!     if event.is_intersecting {
//!         // section entered
//!     }
//! });
//!
//! viewport::refresh_viewport(&layout, Viewport::new(scroll_y, rows));
//!
//! handle.disconnect(); // or drop it
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::layout::{intersection_ratio, ComputedLayout, Viewport};
use crate::types::Threshold;

/// A threshold crossing for one observed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportEvent {
    pub target: usize,
    /// True when the target crossed into the viewport.
    pub is_intersecting: bool,
    /// Visible fraction at the time of the crossing.
    pub ratio: f32,
}

type ObserverCallback = Rc<dyn Fn(ViewportEvent)>;

struct Observation {
    target: usize,
    threshold: Threshold,
    intersecting: bool,
    callback: ObserverCallback,
}

thread_local! {
    /// Observations in subscription order.
    static OBSERVATIONS: RefCell<BTreeMap<u64, Observation>> = RefCell::new(BTreeMap::new());
    static NEXT_OBSERVER_ID: Cell<u64> = const { Cell::new(0) };
}

// =============================================================================
// Subscription
// =============================================================================

/// Subscription to one target's crossings.
///
/// Disconnects on drop.
#[must_use = "dropping the handle disconnects the observer"]
pub struct ObserverHandle {
    id: u64,
    target: usize,
    connected: Cell<bool>,
}

impl ObserverHandle {
    /// Stop observing. Safe to call more than once.
    pub fn disconnect(&self) {
        if !self.connected.replace(false) {
            return;
        }
        let removed = OBSERVATIONS.with(|obs| obs.borrow_mut().remove(&self.id));
        if removed.is_some() {
            tracing::trace!(section = self.target, observer = self.id, "observer disconnected");
        }
        // Callback captures are dropped here, outside the registry borrow
        drop(removed);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    pub fn target(&self) -> usize {
        self.target
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Observe `target`, calling `callback` on every threshold crossing.
pub fn observe(
    target: usize,
    threshold: Threshold,
    callback: impl Fn(ViewportEvent) + 'static,
) -> ObserverHandle {
    let id = NEXT_OBSERVER_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });

    OBSERVATIONS.with(|obs| {
        obs.borrow_mut().insert(
            id,
            Observation {
                target,
                threshold,
                intersecting: false,
                callback: Rc::new(callback),
            },
        );
    });

    tracing::trace!(section = target, observer = id, threshold = threshold.value(), "observer connected");

    ObserverHandle {
        id,
        target,
        connected: Cell::new(true),
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Re-measure every observed target and dispatch crossings.
///
/// Targets without bounds in `layout` count as not intersecting.
/// Returns the number of events dispatched.
pub fn refresh_viewport(layout: &ComputedLayout, viewport: Viewport) -> usize {
    // Update state and collect crossings under the borrow, dispatch after it
    let crossings: Vec<(u64, ViewportEvent, ObserverCallback)> = OBSERVATIONS.with(|obs| {
        let mut obs = obs.borrow_mut();
        obs.iter_mut()
            .filter_map(|(&id, observation)| {
                let ratio = layout
                    .bounds(observation.target)
                    .map(|bounds| intersection_ratio(&bounds, &viewport))
                    .unwrap_or(0.0);
                let intersecting = observation.threshold.is_met(ratio);
                if intersecting == observation.intersecting {
                    return None;
                }
                observation.intersecting = intersecting;
                let event = ViewportEvent {
                    target: observation.target,
                    is_intersecting: intersecting,
                    ratio,
                };
                Some((id, event, observation.callback.clone()))
            })
            .collect()
    });

    let mut dispatched = 0;
    for (id, event, callback) in crossings {
        // An earlier callback may have disconnected this one
        if !is_observing(id) {
            continue;
        }
        tracing::trace!(
            section = event.target,
            intersecting = event.is_intersecting,
            ratio = event.ratio,
            "viewport crossing"
        );
        callback(event);
        dispatched += 1;
    }
    dispatched
}

fn is_observing(id: u64) -> bool {
    OBSERVATIONS.with(|obs| obs.borrow().contains_key(&id))
}

/// Number of live observations.
pub fn observer_count() -> usize {
    OBSERVATIONS.with(|obs| obs.borrow().len())
}

/// Number of live observations of one target.
pub fn observers_of(target: usize) -> usize {
    OBSERVATIONS.with(|obs| obs.borrow().values().filter(|o| o.target == target).count())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every observation. Existing handles become inert.
pub fn reset_viewport() {
    let dropped = OBSERVATIONS.with(|obs| std::mem::take(&mut *obs.borrow_mut()));
    drop(dropped);
}
