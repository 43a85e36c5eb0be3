//! Reveal Sequencer - one-shot section reveal with staggered items.
//!
//! Composes the viewport observer and the stagger scheduler into a small
//! state machine per mounted section:
//!
//! ```text
//! Idle → Armed → Revealing → Settled
//! ```
//!
//! - **Armed**: observer subscribed, waiting for the first entry
//! - **Revealing**: `section_visible` set, item `i` revealed at
//!   `base_delay + i * stagger_interval`
//! - **Settled**: every item revealed; later crossings are ignored
//!
//! Any phase can be cut short by [`RevealHandle::detach`], which releases the
//! observer, cancels unfired items and freezes the state where it stands.
//!
//! The state is exposed through signals so render effects re-run when a
//! section or an item reveals. It is only ever written by the sequencer.
//!
//! # Caller obligations
//!
//! Detach before the target goes away. [`attach_scoped`] does this
//! automatically when the target is released from the registry; dropping
//! the last handle clone also detaches.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::state::reveal;
//!
//! let handle = reveal::attach(section, timeline.len(), RevealConfig::timeline());
//!
//! // Render
//! let visible = handle.section_visible();
//! for i in 0..timeline.len() {
//!     let shown = handle.is_revealed(i);
//! }
//!
//! handle.detach();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{signal, ReactiveSet, Signal};

use crate::engine;
use crate::types::{RevealConfig, SequencePhase};

use super::stagger::{self, StaggerHandle};
use super::viewport::{self, ObserverHandle, ViewportEvent};

// =============================================================================
// SequenceState
// =============================================================================

/// Reveal state of one section, as the renderer sees it.
///
/// Reads are reactive: calling these from an effect or derived tracks them.
/// Clones share the same underlying signals.
#[derive(Clone)]
pub struct SequenceState {
    section_visible: Signal<bool>,
    revealed: Rc<ReactiveSet<usize>>,
    phase: Signal<SequencePhase>,
}

impl SequenceState {
    fn new() -> Self {
        Self {
            section_visible: signal(false),
            revealed: Rc::new(ReactiveSet::new()),
            phase: signal(SequencePhase::Idle),
        }
    }

    /// Has the section entered the viewport?
    pub fn section_visible(&self) -> bool {
        self.section_visible.get()
    }

    /// Has item `index` been revealed?
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    /// Revealed item indices, ascending.
    pub fn revealed_indices(&self) -> Vec<usize> {
        let mut indices = self.revealed.iter();
        indices.sort_unstable();
        indices
    }

    /// Number of revealed items.
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Current phase.
    pub fn phase(&self) -> SequencePhase {
        self.phase.get()
    }
}

// =============================================================================
// Sequencer
// =============================================================================

struct Sequencer {
    target: usize,
    item_count: usize,
    config: RevealConfig,
    state: SequenceState,
    /// Source of truth for transitions; the phase signal mirrors it.
    phase: Cell<SequencePhase>,
    observer: RefCell<Option<ObserverHandle>>,
    stagger: RefCell<Option<StaggerHandle>>,
}

impl Sequencer {
    fn transition(&self, to: SequencePhase) {
        let from = self.phase.replace(to);
        if from == to {
            return;
        }
        tracing::debug!(section = self.target, ?from, ?to, "reveal phase");
        self.state.phase.set(to);
    }

    /// First entry: show the section and start the item schedule.
    fn enter(this: &Rc<Self>, event: ViewportEvent) {
        if !event.is_intersecting || this.phase.get() != SequencePhase::Armed {
            return;
        }

        this.state.section_visible.set(true);
        this.transition(SequencePhase::Revealing);

        if this.item_count == 0 {
            this.transition(SequencePhase::Settled);
            return;
        }

        let weak = Rc::downgrade(this);
        let handle = stagger::schedule(
            this.item_count,
            this.config.stagger_interval,
            this.config.base_delay,
            move |index| {
                if let Some(sequencer) = weak.upgrade() {
                    sequencer.reveal_item(index);
                }
            },
        );
        *this.stagger.borrow_mut() = Some(handle);
    }

    fn reveal_item(&self, index: usize) {
        if self.phase.get() != SequencePhase::Revealing || index >= self.item_count {
            return;
        }

        self.state.revealed.insert(index);
        tracing::trace!(section = self.target, index, "item revealed");

        if self.state.revealed.len() == self.item_count {
            self.transition(SequencePhase::Settled);
            // Spent schedule: dropping it cancels nothing
            let spent = self.stagger.borrow_mut().take();
            debug_assert!(spent.as_ref().is_none_or(StaggerHandle::is_complete));
            drop(spent);
        }
    }

    fn detach(&self) {
        if self.phase.get() == SequencePhase::Detached {
            return;
        }
        self.transition(SequencePhase::Detached);

        // Take both out before dropping so no borrow is held during teardown
        let stagger = self.stagger.borrow_mut().take();
        let observer = self.observer.borrow_mut().take();
        if let Some(stagger) = stagger {
            stagger.cancel();
        }
        if let Some(observer) = observer {
            observer.disconnect();
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.detach();
    }
}

// =============================================================================
// RevealHandle
// =============================================================================

/// Handle to an attached sequencer.
///
/// Clones share the sequencer; it detaches when the last clone is dropped.
#[derive(Clone)]
#[must_use = "dropping the last handle detaches the sequencer"]
pub struct RevealHandle {
    inner: Rc<Sequencer>,
}

impl RevealHandle {
    /// Read-only view of the reveal state.
    pub fn state(&self) -> &SequenceState {
        &self.inner.state
    }

    pub fn phase(&self) -> SequencePhase {
        self.inner.state.phase()
    }

    pub fn section_visible(&self) -> bool {
        self.inner.state.section_visible()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.inner.state.is_revealed(index)
    }

    pub fn revealed_indices(&self) -> Vec<usize> {
        self.inner.state.revealed_indices()
    }

    pub fn target(&self) -> usize {
        self.inner.target
    }

    pub fn item_count(&self) -> usize {
        self.inner.item_count
    }

    pub fn config(&self) -> RevealConfig {
        self.inner.config
    }

    /// Tear down: release the observer and cancel unfired items.
    ///
    /// The state stays frozen at whatever was revealed so far.
    /// Safe to call more than once.
    pub fn detach(&self) {
        self.inner.detach();
    }

    pub fn is_detached(&self) -> bool {
        self.inner.phase.get() == SequencePhase::Detached
    }

    fn downgrade(&self) -> Weak<Sequencer> {
        Rc::downgrade(&self.inner)
    }
}

// =============================================================================
// Attach
// =============================================================================

/// Attach a reveal sequencer to `target`.
///
/// The section reveals on its first crossing of `config.threshold`, which is
/// evaluated on the next [`viewport::refresh_viewport`].
pub fn attach(target: usize, item_count: usize, config: RevealConfig) -> RevealHandle {
    let inner = Rc::new(Sequencer {
        target,
        item_count,
        config,
        state: SequenceState::new(),
        phase: Cell::new(SequencePhase::Idle),
        observer: RefCell::new(None),
        stagger: RefCell::new(None),
    });

    let weak = Rc::downgrade(&inner);
    let observer = viewport::observe(target, config.threshold, move |event| {
        if let Some(sequencer) = weak.upgrade() {
            Sequencer::enter(&sequencer, event);
        }
    });
    *inner.observer.borrow_mut() = Some(observer);
    inner.transition(SequencePhase::Armed);

    RevealHandle { inner }
}

/// Attach, and detach automatically when `target` is released.
pub fn attach_scoped(target: usize, item_count: usize, config: RevealConfig) -> RevealHandle {
    let handle = attach(target, item_count, config);
    let weak = handle.downgrade();
    engine::on_destroy(target, move || {
        if let Some(sequencer) = weak.upgrade() {
            sequencer.detach();
        }
    });
    handle
}
