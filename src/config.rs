//! Page presets - RON-defined sections and their reveal parameters.
//!
//! A preset lists the page's sections top to bottom. Each section has a title,
//! optional body lines shown as soon as the section is visible, and items
//! revealed one by one on the section's stagger.
//!
//! ```ron
//! PagePreset(
//!     name: "portfolio",
//!     gap: 1,
//!     sections: [
//!         (
//!             id: "experience",
//!             title: "Experience",
//!             items: ["Senior Full Stack Developer", "Full Stack Developer"],
//!             reveal: (threshold: 0.1, stagger_ms: 300),
//!         ),
//!     ],
//! )
//! ```
//!
//! Reveal parameters are visual-only, so bad values are normalized rather
//! than rejected: negative durations become zero and thresholds are clamped
//! into `(0, 1]`.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::PageError;
use crate::types::{RevealConfig, Threshold};

/// Built-in six-section portfolio page.
pub const PORTFOLIO_RON: &str = include_str!("../presets/portfolio.ron");

/// Reveal parameters as written in a preset.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RevealPreset {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub stagger_ms: i64,
    #[serde(default)]
    pub base_delay_ms: i64,
}

fn default_threshold() -> f32 {
    Threshold::SECTION.value()
}

fn non_negative_ms(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}

impl RevealPreset {
    /// Normalized sequencer config.
    pub fn to_config(&self) -> RevealConfig {
        RevealConfig {
            threshold: Threshold::new(self.threshold),
            stagger_interval: non_negative_ms(self.stagger_ms),
            base_delay: non_negative_ms(self.base_delay_ms),
        }
    }
}

impl Default for RevealPreset {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            stagger_ms: 0,
            base_delay_ms: 0,
        }
    }
}

/// One page section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionPreset {
    pub id: String,
    pub title: String,
    /// Lines shown with the section itself.
    #[serde(default)]
    pub body: Vec<String>,
    /// Lines revealed one at a time on the stagger.
    #[serde(default)]
    pub items: Vec<String>,
    /// Minimum height in rows.
    #[serde(default)]
    pub min_rows: u16,
    /// Stretch to at least one full viewport (hero screens).
    #[serde(default)]
    pub fill_viewport: bool,
    /// Paint revealed `"Label  NN%"` items as level bars.
    #[serde(default)]
    pub level_bars: bool,
    #[serde(default)]
    pub reveal: RevealPreset,
}

impl SectionPreset {
    /// Rows the section content needs: title, spacer, body, items, spacer.
    pub fn content_rows(&self) -> u16 {
        let lines = 1 + 1 + self.body.len() + self.items.len() + 1;
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    /// Minimum rows for a viewport of `viewport_height` rows.
    pub fn min_rows_for(&self, viewport_height: u16) -> u16 {
        if self.fill_viewport {
            self.min_rows.max(viewport_height)
        } else {
            self.min_rows
        }
    }
}

fn default_gap() -> u16 {
    1
}

/// A whole page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PagePreset {
    pub name: String,
    /// Blank rows between sections.
    #[serde(default = "default_gap")]
    pub gap: u16,
    pub sections: Vec<SectionPreset>,
}

impl PagePreset {
    /// Parse a preset from RON text.
    pub fn from_ron(text: &str) -> Result<Self, PageError> {
        let preset: PagePreset = ron::from_str(text)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Load a preset from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PageError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let preset = Self::from_ron(&text)?;
        tracing::debug!(path = %path.display(), sections = preset.sections.len(), "loaded page preset");
        Ok(preset)
    }

    /// The built-in portfolio page.
    pub fn portfolio() -> Result<Self, PageError> {
        Self::from_ron(PORTFOLIO_RON)
    }

    /// Section ids must be unique: they name reveal targets.
    pub fn validate(&self) -> Result<(), PageError> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(PageError::DuplicateSection(section.id.clone()));
            }
        }
        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&SectionPreset> {
        self.sections.iter().find(|s| s.id == id)
    }
}
