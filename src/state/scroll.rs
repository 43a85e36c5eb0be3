//! Scroll State - vertical scroll offset of page containers.
//!
//! - Per-container scroll offset (user state, keyed by target index)
//! - Scroll bounds from the computed page layout
//! - Scroll operations with clamping
//!
//! Offsets only change here; the page refreshes the viewport observer after
//! every change that actually moved.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::layout::{ComputedLayout, Viewport};

// =============================================================================
// SCROLL CONSTANTS
// =============================================================================

/// Default scroll amount for arrow keys (lines).
pub const LINE_SCROLL: i32 = 1;

/// Default scroll amount for mouse wheel.
pub const WHEEL_SCROLL: i32 = 3;

/// Default scroll amount for Page Up/Down (90% of viewport).
pub const PAGE_SCROLL_FACTOR: f32 = 0.9;

thread_local! {
    static SCROLL_OFFSETS: RefCell<HashMap<usize, u16>> = RefCell::new(HashMap::new());
}

// =============================================================================
// SCROLL STATE ACCESS
// =============================================================================

/// Current scroll offset of a container.
pub fn get_scroll_offset(container: usize) -> u16 {
    SCROLL_OFFSETS.with(|offsets| offsets.borrow().get(&container).copied().unwrap_or(0))
}

/// The viewport a container currently shows.
pub fn viewport_of(container: usize, height: u16) -> Viewport {
    Viewport::new(get_scroll_offset(container), height)
}

/// Rows one Page Up/Down moves for a viewport of `height` rows (at least 1).
pub fn page_scroll_amount(height: u16) -> i32 {
    ((height as f32 * PAGE_SCROLL_FACTOR) as i32).max(1)
}

// =============================================================================
// SCROLL OPERATIONS
// =============================================================================

/// Set the scroll offset, clamped to the page.
///
/// Returns `true` if the offset changed.
pub fn set_scroll_offset(layout: &ComputedLayout, container: usize, height: u16, y: u16) -> bool {
    let clamped = y.min(layout.max_scroll(height));
    let current = get_scroll_offset(container);
    if clamped == current {
        return false;
    }
    SCROLL_OFFSETS.with(|offsets| {
        offsets.borrow_mut().insert(container, clamped);
    });
    true
}

/// Scroll by a delta amount.
///
/// Returns `true` if scrolling occurred, `false` if already at boundary.
pub fn scroll_by(layout: &ComputedLayout, container: usize, height: u16, delta: i32) -> bool {
    let current = get_scroll_offset(container) as i32;
    let max = layout.max_scroll(height) as i32;
    let new_y = current.saturating_add(delta).clamp(0, max) as u16;
    set_scroll_offset(layout, container, height, new_y)
}

/// Scroll to top.
pub fn scroll_to_top(layout: &ComputedLayout, container: usize, height: u16) -> bool {
    set_scroll_offset(layout, container, height, 0)
}

/// Scroll to bottom.
pub fn scroll_to_bottom(layout: &ComputedLayout, container: usize, height: u16) -> bool {
    set_scroll_offset(layout, container, height, layout.max_scroll(height))
}

/// Re-clamp after the layout or viewport changed size.
pub fn clamp_scroll(layout: &ComputedLayout, container: usize, height: u16) -> bool {
    let current = get_scroll_offset(container);
    set_scroll_offset(layout, container, height, current)
}

/// Forget a container's offset (unmount).
pub fn clear_scroll(container: usize) {
    SCROLL_OFFSETS.with(|offsets| {
        offsets.borrow_mut().remove(&container);
    });
}

/// Reset all scroll state (for testing).
pub fn reset_scroll() {
    SCROLL_OFFSETS.with(|offsets| offsets.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(content_height: u16) -> ComputedLayout {
        ComputedLayout {
            content_height,
            ..ComputedLayout::new()
        }
    }

    #[test]
    fn test_default_offset() {
        reset_scroll();
        assert_eq!(get_scroll_offset(0), 0);
        assert_eq!(viewport_of(0, 24), Viewport::new(0, 24));
    }

    #[test]
    fn test_set_scroll_offset_clamps() {
        reset_scroll();
        let layout = layout(100);

        assert!(set_scroll_offset(&layout, 0, 20, 50));
        assert_eq!(get_scroll_offset(0), 50);

        assert!(set_scroll_offset(&layout, 0, 20, 500));
        assert_eq!(get_scroll_offset(0), 80);

        // Already there
        assert!(!set_scroll_offset(&layout, 0, 20, 80));
    }

    #[test]
    fn test_scroll_by() {
        reset_scroll();
        let layout = layout(50);

        assert!(scroll_by(&layout, 0, 10, 5));
        assert_eq!(get_scroll_offset(0), 5);

        assert!(scroll_by(&layout, 0, 10, -10));
        assert_eq!(get_scroll_offset(0), 0);

        // At top boundary
        assert!(!scroll_by(&layout, 0, 10, -1));

        assert!(scroll_by(&layout, 0, 10, 1000));
        assert_eq!(get_scroll_offset(0), 40);
        assert!(!scroll_by(&layout, 0, 10, WHEEL_SCROLL));
    }

    #[test]
    fn test_scroll_by_extreme_deltas() {
        reset_scroll();
        let layout = layout(50);
        set_scroll_offset(&layout, 0, 10, 5);

        assert!(scroll_by(&layout, 0, 10, i32::MAX));
        assert_eq!(get_scroll_offset(0), 40);

        assert!(scroll_by(&layout, 0, 10, i32::MIN));
        assert_eq!(get_scroll_offset(0), 0);
    }

    #[test]
    fn test_short_page_never_scrolls() {
        reset_scroll();
        let layout = layout(10);
        assert!(!scroll_by(&layout, 0, 24, LINE_SCROLL));
        assert!(!scroll_to_bottom(&layout, 0, 24));
    }

    #[test]
    fn test_top_and_bottom() {
        reset_scroll();
        let layout = layout(64);

        assert!(scroll_to_bottom(&layout, 3, 24));
        assert_eq!(get_scroll_offset(3), 40);
        assert!(scroll_to_top(&layout, 3, 24));
        assert_eq!(get_scroll_offset(3), 0);
    }

    #[test]
    fn test_clamp_after_resize() {
        reset_scroll();
        let layout = layout(100);
        set_scroll_offset(&layout, 0, 20, 80);

        // Taller viewport: max scroll drops to 60
        assert!(clamp_scroll(&layout, 0, 40));
        assert_eq!(get_scroll_offset(0), 60);
    }

    #[test]
    fn test_page_scroll_amount() {
        assert_eq!(page_scroll_amount(20), 18);
        assert_eq!(page_scroll_amount(1), 1);
        assert_eq!(page_scroll_amount(0), 1);
    }

    #[test]
    fn test_clear_scroll() {
        reset_scroll();
        let layout = layout(100);
        set_scroll_offset(&layout, 2, 10, 30);
        clear_scroll(2);
        assert_eq!(get_scroll_offset(2), 0);
    }
}
