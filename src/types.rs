//! Core types for reveal sequencing and rendering.
//!
//! - `Threshold` - intersection ratio that counts as "entered"
//! - `RevealConfig` - per-section sequencer parameters
//! - `SequencePhase` - reveal state machine phases
//! - `Rgba`, `Attr`, `Cell` - what the renderer paints

use std::time::Duration;

// =============================================================================
// Threshold
// =============================================================================

/// Fraction of a region that must be on screen before it counts as entered.
///
/// Always in `(0, 1]`. Out-of-range input is clamped; non-finite or
/// non-positive input falls back to [`Threshold::MIN`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f32);

impl Threshold {
    /// Smallest accepted threshold.
    pub const MIN: Self = Self(0.01);

    /// Header and content sections (20% visible).
    pub const SECTION: Self = Self(0.2);

    /// Long list sections (10% visible).
    pub const LIST: Self = Self(0.1);

    /// Whole region must be visible.
    pub const FULL: Self = Self(1.0);

    /// Create a threshold, clamping into `(0, 1]`.
    pub fn new(value: f32) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::MIN;
        }
        Self(value.clamp(Self::MIN.0, 1.0))
    }

    /// Raw ratio.
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Does `ratio` meet this threshold?
    #[inline]
    pub fn is_met(self, ratio: f32) -> bool {
        ratio > 0.0 && ratio >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::SECTION
    }
}

impl From<f32> for Threshold {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// RevealConfig
// =============================================================================

/// Parameters for one reveal sequencer.
///
/// Item `i` reveals at `base_delay + i * stagger_interval` after the section
/// first enters the viewport. A zero interval reveals every item at
/// `base_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    pub threshold: Threshold,
    pub stagger_interval: Duration,
    pub base_delay: Duration,
}

impl RevealConfig {
    /// Plain section: 20% threshold, no stagger.
    pub const fn section() -> Self {
        Self {
            threshold: Threshold::SECTION,
            stagger_interval: Duration::ZERO,
            base_delay: Duration::ZERO,
        }
    }

    /// Timeline entries: 10% threshold, 300ms apart.
    pub const fn timeline() -> Self {
        Self {
            threshold: Threshold::LIST,
            stagger_interval: Duration::from_millis(300),
            base_delay: Duration::ZERO,
        }
    }

    /// Skill bars: 20% threshold, 150ms apart.
    pub const fn skills() -> Self {
        Self {
            threshold: Threshold::SECTION,
            stagger_interval: Duration::from_millis(150),
            base_delay: Duration::ZERO,
        }
    }

    pub fn with_threshold(mut self, threshold: impl Into<Threshold>) -> Self {
        self.threshold = threshold.into();
        self
    }

    pub fn with_stagger(mut self, interval: Duration) -> Self {
        self.stagger_interval = interval;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Offset of item `index` from the moment the section entered.
    pub fn offset_of(&self, index: usize) -> Duration {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_delay
            .saturating_add(self.stagger_interval.saturating_mul(steps))
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::section()
    }
}

// =============================================================================
// SequencePhase
// =============================================================================

/// Phase of a reveal sequencer.
///
/// ```text
/// Idle → Armed → Revealing → Settled
///   \______\________\__________\____→ Detached
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SequencePhase {
    /// Created, observer not subscribed yet.
    #[default]
    Idle,
    /// Waiting for the first viewport entry.
    Armed,
    /// Section visible, items revealing on the stagger.
    Revealing,
    /// Every item revealed. Terminal for this mount.
    Settled,
    /// Torn down; state frozen.
    Detached,
}

impl SequencePhase {
    /// No further transitions will happen.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Settled | Self::Detached)
    }
}

// =============================================================================
// Rgba
// =============================================================================

/// Terminal color. Negative channels mean "terminal default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Portfolio accent blue.
    pub const ACCENT: Self = Self::rgb(0x36, 0x64, 0xF4);

    pub const fn is_terminal_default(&self) -> bool {
        self.r < 0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TERMINAL_DEFAULT
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
    }
}

// =============================================================================
// Cell
// =============================================================================

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_clamps() {
        assert_eq!(Threshold::new(0.5).value(), 0.5);
        assert_eq!(Threshold::new(3.0).value(), 1.0);
        assert_eq!(Threshold::new(0.0), Threshold::MIN);
        assert_eq!(Threshold::new(-1.0), Threshold::MIN);
        assert_eq!(Threshold::new(f32::NAN), Threshold::MIN);
    }

    #[test]
    fn test_threshold_is_met() {
        let t = Threshold::SECTION;
        assert!(!t.is_met(0.0));
        assert!(!t.is_met(0.19));
        assert!(t.is_met(0.2));
        assert!(t.is_met(1.0));
    }

    #[test]
    fn test_offset_of() {
        let config = RevealConfig::timeline().with_base_delay(Duration::from_millis(100));
        assert_eq!(config.offset_of(0), Duration::from_millis(100));
        assert_eq!(config.offset_of(3), Duration::from_millis(1000));

        let flat = RevealConfig::section().with_base_delay(Duration::from_millis(50));
        assert_eq!(flat.offset_of(7), Duration::from_millis(50));
    }

    #[test]
    fn test_phase_is_final() {
        assert!(!SequencePhase::Idle.is_final());
        assert!(!SequencePhase::Armed.is_final());
        assert!(!SequencePhase::Revealing.is_final());
        assert!(SequencePhase::Settled.is_final());
        assert!(SequencePhase::Detached.is_final());
    }

    #[test]
    fn test_attr_flags() {
        let attrs = Attr::BOLD | Attr::DIM;
        assert!(attrs.contains(Attr::BOLD));
        assert!(!attrs.contains(Attr::UNDERLINE));
    }
}
