//! Stagger Scheduler - reveal events for `n` items at a fixed spacing.
//!
//! Item `i` fires at `start + base_delay + i * interval`, where `start` is
//! the moment [`schedule`] was called. Every item gets its own timer at its
//! own absolute deadline up front; timers are never chained off each other,
//! so a slow tick delays a reveal but never pushes the later ones back.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::state::stagger;
//!
//! let handle = stagger::schedule(4, Duration::from_millis(300), Duration::ZERO, |index| {
//!     // item `index` revealed
//! });
//!
//! // Unmount: unfired items never fire
//! handle.cancel();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::timers::{self, TimerId};

struct StaggerState {
    total: usize,
    fired: Cell<usize>,
    cancelled: Cell<bool>,
    timers: RefCell<Vec<TimerId>>,
}

/// Running stagger schedule. Cancels on drop.
#[must_use = "dropping the handle cancels the schedule"]
pub struct StaggerHandle {
    state: Rc<StaggerState>,
}

impl StaggerHandle {
    /// Prevent every unfired event from firing. Safe to call more than once.
    ///
    /// A schedule that already fired every event stays uncancelled.
    pub fn cancel(&self) {
        if self.is_complete() || self.state.cancelled.replace(true) {
            return;
        }
        let ids = std::mem::take(&mut *self.state.timers.borrow_mut());
        let cleared = ids.into_iter().filter(|&id| timers::clear_timeout(id)).count();
        if cleared > 0 {
            tracing::trace!(
                fired = self.state.fired.get(),
                cancelled = cleared,
                "stagger cancelled"
            );
        }
    }

    /// Events fired so far.
    pub fn fired(&self) -> usize {
        self.state.fired.get()
    }

    /// Events this schedule was created with.
    pub fn total(&self) -> usize {
        self.state.total
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Every event has fired.
    pub fn is_complete(&self) -> bool {
        self.state.fired.get() == self.state.total
    }
}

impl Drop for StaggerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Schedule `n` reveal events, `interval` apart, the first after `base_delay`.
///
/// `on_reveal` receives the item index; indices fire strictly in order.
/// A zero interval fires every item at `base_delay`, still in index order.
pub fn schedule(
    n: usize,
    interval: Duration,
    base_delay: Duration,
    on_reveal: impl Fn(usize) + 'static,
) -> StaggerHandle {
    let state = Rc::new(StaggerState {
        total: n,
        fired: Cell::new(0),
        cancelled: Cell::new(false),
        timers: RefCell::new(Vec::with_capacity(n)),
    });
    let on_reveal: Rc<dyn Fn(usize)> = Rc::new(on_reveal);

    let start = timers::now();
    let mut offset = base_delay;
    for index in 0..n {
        let state_ref = state.clone();
        let on_reveal = on_reveal.clone();
        let id = timers::set_timer_at(start.saturating_add(offset), move || {
            state_ref.fired.set(state_ref.fired.get() + 1);
            on_reveal(index);
        });
        state.timers.borrow_mut().push(id);
        offset = offset.saturating_add(interval);
    }

    tracing::trace!(
        items = n,
        interval_ms = interval.as_millis() as u64,
        base_delay_ms = base_delay.as_millis() as u64,
        "stagger scheduled"
    );

    StaggerHandle { state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clock::{Clock, ManualClock};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup() -> ManualClock {
        timers::reset_timers();
        let clock = ManualClock::new();
        timers::use_clock(clock.clone());
        clock
    }

    /// Records (index, time fired).
    fn recorder() -> (Rc<RefCell<Vec<(usize, Duration)>>>, impl Fn(usize) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, move |index| sink.borrow_mut().push((index, timers::now())))
    }

    /// Step the clock 1ms at a time so each event is stamped when it is due.
    fn run_for(clock: &ManualClock, total: Duration) {
        let end = clock.now() + total;
        timers::run_due_timers();
        while clock.now() < end {
            clock.advance(ms(1));
            timers::run_due_timers();
        }
    }

    #[test]
    fn test_fires_at_offsets() {
        let clock = setup();
        let (log, on_reveal) = recorder();

        let handle = schedule(4, ms(300), Duration::ZERO, on_reveal);
        run_for(&clock, ms(1000));

        assert_eq!(
            *log.borrow(),
            vec![(0, ms(0)), (1, ms(300)), (2, ms(600)), (3, ms(900))]
        );
        assert!(handle.is_complete());
        assert_eq!(handle.fired(), 4);
    }

    #[test]
    fn test_base_delay() {
        let clock = setup();
        let (log, on_reveal) = recorder();

        let _handle = schedule(2, ms(100), ms(250), on_reveal);
        run_for(&clock, ms(400));

        assert_eq!(*log.borrow(), vec![(0, ms(250)), (1, ms(350))]);
    }

    #[test]
    fn test_zero_interval_fires_together_in_order() {
        let clock = setup();
        let (log, on_reveal) = recorder();

        let _handle = schedule(5, Duration::ZERO, ms(50), on_reveal);
        clock.advance(ms(50));
        assert_eq!(timers::run_due_timers(), 5);

        let indices: Vec<usize> = log.borrow().iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_schedule() {
        setup();
        let handle = schedule(0, ms(100), Duration::ZERO, |_| panic!("no items"));
        assert!(handle.is_complete());
        assert_eq!(timers::pending_timers(), 0);
    }

    #[test]
    fn test_cancel_mid_sequence() {
        let clock = setup();
        let (log, on_reveal) = recorder();

        let handle = schedule(5, ms(100), Duration::ZERO, on_reveal);
        run_for(&clock, ms(150));
        assert_eq!(handle.fired(), 2);

        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(timers::pending_timers(), 0);

        run_for(&clock, ms(1000));
        assert_eq!(log.borrow().len(), 2);
        assert!(!handle.is_complete());
    }

    #[test]
    fn test_drop_cancels() {
        let clock = setup();
        let (log, on_reveal) = recorder();

        drop(schedule(3, ms(10), ms(10), on_reveal));
        run_for(&clock, ms(100));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_cancel_after_complete_is_noop() {
        let clock = setup();
        let (log, on_reveal) = recorder();

        let handle = schedule(2, ms(10), Duration::ZERO, on_reveal);
        run_for(&clock, ms(50));
        assert!(handle.is_complete());

        handle.cancel();
        assert!(!handle.is_cancelled());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_late_tick_does_not_shift_later_items() {
        let clock = setup();
        let (log, on_reveal) = recorder();

        let _handle = schedule(3, ms(300), Duration::ZERO, on_reveal);
        timers::run_due_timers();

        // Loop stalls for 450ms: item 1 fires late...
        clock.advance(ms(450));
        timers::run_due_timers();
        // ...but item 2 is still due at 600ms, not 450 + 300
        clock.advance(ms(150));
        timers::run_due_timers();

        assert_eq!(
            *log.borrow(),
            vec![(0, ms(0)), (1, ms(450)), (2, ms(600))]
        );
    }
}
