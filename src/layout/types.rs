//! Layout output types and viewport geometry.

/// A rectangle in page coordinates (rows/columns from the top of the page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// One past the last row.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }
}

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible page row.
    pub scroll_y: u16,
    /// Number of visible rows.
    pub height: u16,
}

impl Viewport {
    pub const fn new(scroll_y: u16, height: u16) -> Self {
        Self { scroll_y, height }
    }

    /// One past the last visible row.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.scroll_y as u32 + self.height as u32
    }

    /// Number of rows of `bounds` inside the viewport.
    pub fn visible_rows(&self, bounds: &Rect) -> u16 {
        let top = (bounds.y as u32).max(self.scroll_y as u32);
        let bottom = bounds.bottom().min(self.bottom());
        bottom.saturating_sub(top) as u16
    }
}

/// Fraction of `bounds` that lies inside `viewport`, in `[0, 1]`.
///
/// Empty regions never intersect.
pub fn intersection_ratio(bounds: &Rect, viewport: &Viewport) -> f32 {
    if bounds.height == 0 {
        return 0.0;
    }
    viewport.visible_rows(bounds) as f32 / bounds.height as f32
}

/// Computed page layout, indexed by target.
///
/// Targets that were not laid out have zero height and no bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedLayout {
    pub x: Vec<u16>,
    pub y: Vec<u16>,
    pub width: Vec<u16>,
    pub height: Vec<u16>,
    /// Total page height in rows.
    pub content_height: u16,
}

impl ComputedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout with room for `size` targets.
    pub fn with_capacity(size: usize) -> Self {
        Self {
            x: vec![0; size],
            y: vec![0; size],
            width: vec![0; size],
            height: vec![0; size],
            content_height: 0,
        }
    }

    /// Bounds of a target, if it was laid out.
    pub fn bounds(&self, target: usize) -> Option<Rect> {
        let height = *self.height.get(target)?;
        if height == 0 {
            return None;
        }
        Some(Rect {
            x: self.x[target],
            y: self.y[target],
            width: self.width[target],
            height,
        })
    }

    /// Largest valid scroll offset for a viewport of `viewport_height` rows.
    pub fn max_scroll(&self, viewport_height: u16) -> u16 {
        self.content_height.saturating_sub(viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_rows() {
        let viewport = Viewport::new(10, 20);

        // Fully inside
        assert_eq!(viewport.visible_rows(&Rect::new(0, 12, 80, 5)), 5);
        // Straddling top edge
        assert_eq!(viewport.visible_rows(&Rect::new(0, 5, 80, 10)), 5);
        // Straddling bottom edge
        assert_eq!(viewport.visible_rows(&Rect::new(0, 25, 80, 10)), 5);
        // Above and below
        assert_eq!(viewport.visible_rows(&Rect::new(0, 0, 80, 10)), 0);
        assert_eq!(viewport.visible_rows(&Rect::new(0, 30, 80, 10)), 0);
    }

    #[test]
    fn test_intersection_ratio() {
        let viewport = Viewport::new(0, 24);

        assert_eq!(intersection_ratio(&Rect::new(0, 0, 80, 12), &viewport), 1.0);
        assert_eq!(intersection_ratio(&Rect::new(0, 20, 80, 8), &viewport), 0.5);
        assert_eq!(intersection_ratio(&Rect::new(0, 40, 80, 8), &viewport), 0.0);
        assert_eq!(intersection_ratio(&Rect::new(0, 0, 80, 0), &viewport), 0.0);
    }

    #[test]
    fn test_region_taller_than_viewport() {
        // 100-row region in a 10-row viewport tops out at 10%
        let ratio = intersection_ratio(&Rect::new(0, 0, 80, 100), &Viewport::new(50, 10));
        assert!((ratio - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bounds_lookup() {
        let mut layout = ComputedLayout::with_capacity(2);
        layout.y[1] = 30;
        layout.width[1] = 80;
        layout.height[1] = 12;

        assert_eq!(layout.bounds(0), None);
        assert_eq!(layout.bounds(1), Some(Rect::new(0, 30, 80, 12)));
        assert_eq!(layout.bounds(7), None);
    }

    #[test]
    fn test_max_scroll() {
        let layout = ComputedLayout {
            content_height: 100,
            ..ComputedLayout::new()
        };
        assert_eq!(layout.max_scroll(24), 76);
        assert_eq!(layout.max_scroll(200), 0);
    }
}
