//! Target Registry - Index allocation for reveal targets.
//!
//! A reveal target is an observable region (one page section). Targets are
//! indices, not objects:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - ReactiveSet of allocated indices (deriveds react to mount/unmount)
//! - Destroy callbacks run once when a target is released

use std::cell::RefCell;
use std::collections::HashMap;
use spark_signals::ReactiveSet;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map target ID to index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map index to target ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Currently allocated indices.
    static ALLOCATED_TARGETS: ReactiveSet<usize> = ReactiveSet::new();

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new target (mount).
///
/// If `id` is already allocated, its existing index is returned.
/// Without an `id`, one is generated (`t0`, `t1`, ...).
pub fn allocate_target(id: Option<&str>) -> usize {
    let target_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("t{}", *counter);
            *counter += 1;
            id
        }),
    };

    let existing = ID_TO_INDEX.with(|map| map.borrow().get(&target_id).copied());
    if let Some(index) = existing {
        return index;
    }

    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    tracing::trace!(target_id = %target_id, index, "target allocated");

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(target_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, target_id);
    });
    ALLOCATED_TARGETS.with(|set| {
        set.insert(index);
    });

    index
}

/// Release a target (unmount).
///
/// Destroy callbacks run first, while the index is still allocated, so
/// anything torn down by them sees a live target.
pub fn release_target(index: usize) {
    let id = INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned());
    let Some(id) = id else { return };

    run_destroy_callbacks(index);

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    ALLOCATED_TARGETS.with(|set| {
        set.remove(&index);
    });
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });

    tracing::trace!(target_id = %id, index, "target released");

    // Last target gone: start numbering from zero again
    let is_empty = ALLOCATED_TARGETS.with(|set| set.is_empty());
    if is_empty {
        FREE_INDICES.with(|free| free.borrow_mut().clear());
        NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    }
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the target at `index` is released.
///
/// Callbacks for unallocated indices are dropped without running.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    if !is_allocated(index) {
        return;
    }
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for a target ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Get all currently allocated targets.
///
/// Note: This creates a reactive dependency when called from a derived/effect.
pub fn get_allocated_targets() -> Vec<usize> {
    ALLOCATED_TARGETS.with(|set| set.iter())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_TARGETS.with(|set| set.contains(&index))
}

/// Count of currently allocated targets.
pub fn get_allocated_count() -> usize {
    ALLOCATED_TARGETS.with(|set| set.len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
///
/// Pending destroy callbacks are dropped without running.
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_TARGETS.with(|set| set.clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    let dropped = DESTROY_CALLBACKS.with(|callbacks| std::mem::take(&mut *callbacks.borrow_mut()));
    drop(dropped);
}
