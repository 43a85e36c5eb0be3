//! Timer Queue - the UI loop's timer primitive.
//!
//! Single-threaded, like everything else on the UI thread. Timers are
//! one-shot callbacks keyed by an absolute deadline on the installed clock.
//! Nothing fires on its own: the loop calls [`run_due_timers`] every tick and
//! uses [`time_until_next_timer`] as its poll timeout.
//!
//! # Ordering
//!
//! Due timers fire in deadline order; equal deadlines fire in the order they
//! were scheduled. Callbacks run with the queue unlocked, so they may schedule
//! or cancel other timers.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::state::timers;
//!
//! let id = timers::set_timeout(Duration::from_millis(300), || println!("fired"));
//! timers::clear_timeout(id); // never fires
//!
//! // In the UI loop
//! timers::run_due_timers();
//! ```

use std::cell::{Cell, RefCell};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

// =============================================================================
// Queue State
// =============================================================================

#[derive(Default)]
struct TimerQueue {
    /// (deadline, sequence) min-heap. Cancelled entries are skipped lazily.
    heap: BinaryHeap<Reverse<(Duration, u64)>>,
    /// Live callbacks by sequence number.
    callbacks: HashMap<u64, Box<dyn FnOnce()>>,
}

thread_local! {
    static CLOCK: RefCell<Rc<dyn Clock>> = RefCell::new(Rc::new(SystemClock::new()) as Rc<dyn Clock>);
    static QUEUE: RefCell<TimerQueue> = RefCell::new(TimerQueue::default());
    static NEXT_SEQ: Cell<u64> = const { Cell::new(0) };
}

// =============================================================================
// Clock
// =============================================================================

/// Install the clock all timers on this thread are measured against.
///
/// Pending deadlines are not rebased; swap clocks before scheduling.
pub fn use_clock(clock: impl Clock + 'static) {
    CLOCK.with(|c| *c.borrow_mut() = Rc::new(clock));
}

/// Current time on the installed clock.
pub fn now() -> Duration {
    let clock = CLOCK.with(|c| c.borrow().clone());
    clock.now()
}

// =============================================================================
// Scheduling
// =============================================================================

/// Fire `callback` once at absolute time `deadline`.
///
/// A deadline in the past fires on the next [`run_due_timers`].
pub fn set_timer_at(deadline: Duration, callback: impl FnOnce() + 'static) -> TimerId {
    let seq = NEXT_SEQ.with(|next| {
        let seq = next.get();
        next.set(seq + 1);
        seq
    });

    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        queue.heap.push(Reverse((deadline, seq)));
        queue.callbacks.insert(seq, Box::new(callback));
    });

    TimerId(seq)
}

/// Fire `callback` once, `delay` from now.
pub fn set_timeout(delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
    set_timer_at(now().saturating_add(delay), callback)
}

/// Cancel a pending timer.
///
/// Returns `false` if it already fired or was already cancelled.
pub fn clear_timeout(id: TimerId) -> bool {
    QUEUE.with(|queue| queue.borrow_mut().callbacks.remove(&id.0).is_some())
}

/// Is this timer still waiting to fire?
pub fn is_pending(id: TimerId) -> bool {
    QUEUE.with(|queue| queue.borrow().callbacks.contains_key(&id.0))
}

// =============================================================================
// Firing
// =============================================================================

/// Pop the next due callback, discarding cancelled heap entries on the way.
fn pop_due(now: Duration) -> Option<Box<dyn FnOnce()>> {
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        while let Some(&Reverse((deadline, seq))) = queue.heap.peek() {
            if deadline > now {
                return None;
            }
            queue.heap.pop();
            if let Some(callback) = queue.callbacks.remove(&seq) {
                return Some(callback);
            }
        }
        None
    })
}

/// Fire every timer whose deadline has passed.
///
/// Returns the number of callbacks run.
pub fn run_due_timers() -> usize {
    let now = now();
    let mut fired = 0;
    while let Some(callback) = pop_due(now) {
        callback();
        fired += 1;
    }
    fired
}

/// How long until the earliest pending timer is due.
///
/// `Some(Duration::ZERO)` if one is already due, `None` if nothing is pending.
pub fn time_until_next_timer() -> Option<Duration> {
    let now = now();
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        while let Some(&Reverse((deadline, seq))) = queue.heap.peek() {
            if queue.callbacks.contains_key(&seq) {
                return Some(deadline.saturating_sub(now));
            }
            queue.heap.pop();
        }
        None
    })
}

/// Number of timers waiting to fire.
pub fn pending_timers() -> usize {
    QUEUE.with(|queue| queue.borrow().callbacks.len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every pending timer and reinstall the system clock.
pub fn reset_timers() {
    let dropped = QUEUE.with(|queue| std::mem::take(&mut *queue.borrow_mut()));
    drop(dropped);
    NEXT_SEQ.with(|next| next.set(0));
    use_clock(SystemClock::new());
}
