//! Page - mounted sections, scroll position and the reveal pipeline.
//!
//! ```text
//! PagePreset → targets → taffy layout → reveal sequencers
//!                              ↑               ↑
//!                 scroll/resize → refresh_viewport
//!                                 tick → run_due_timers
//! ```
//!
//! Every change that moves the viewport (scroll, resize) re-runs the
//! viewport observer; `tick` fires due stagger timers. Unmounting releases
//! the section targets, which detaches their sequencers.
//!
//! # Example
//!
//! ```ignore
//! use spark_reveal::pipeline::Page;
//!
//! let mut page = Page::mount(&PagePreset::portfolio()?, 80, 24)?;
//! loop {
//!     page.tick();
//!     // read page.sections() to render
//!     page.scroll_by(3);
//! }
//! page.unmount();
//! ```

use crate::config::{PagePreset, SectionPreset};
use crate::engine;
use crate::error::PageError;
use crate::layout::{compute_page_layout, ComputedLayout, PageNode, Viewport};
use crate::state::reveal::{self, RevealHandle};
use crate::state::{scroll, timers, viewport};

// =============================================================================
// MountedSection
// =============================================================================

/// One section of a mounted page.
pub struct MountedSection {
    target: usize,
    preset: SectionPreset,
    reveal: RevealHandle,
}

impl MountedSection {
    pub fn id(&self) -> &str {
        &self.preset.id
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn preset(&self) -> &SectionPreset {
        &self.preset
    }

    /// The section's reveal sequencer.
    pub fn reveal(&self) -> &RevealHandle {
        &self.reveal
    }
}

// =============================================================================
// Page
// =============================================================================

/// A mounted page.
///
/// Unmounts on drop.
pub struct Page {
    name: String,
    gap: u16,
    /// Scroll container target.
    container: usize,
    sections: Vec<MountedSection>,
    layout: ComputedLayout,
    width: u16,
    height: u16,
    mounted: bool,
}

impl Page {
    /// Mount `preset` into a `width` x `height` viewport.
    ///
    /// Sections already on screen at mount time reveal right away.
    pub fn mount(preset: &PagePreset, width: u16, height: u16) -> Result<Self, PageError> {
        preset.validate()?;

        // Targets are named after the page; a second mount would share them
        let container_id = format!("{}/page", preset.name);
        if engine::get_index(&container_id).is_some() {
            return Err(PageError::AlreadyMounted(preset.name.clone()));
        }

        let container = engine::allocate_target(Some(&container_id));
        let mut sections = Vec::with_capacity(preset.sections.len());
        for section in &preset.sections {
            let target = engine::allocate_target(Some(&format!("{}:{}", preset.name, section.id)));
            sections.push((target, section.clone()));
        }

        let nodes = page_nodes(&sections, height);
        let layout = match compute_page_layout(&nodes, width, preset.gap) {
            Ok(layout) => layout,
            Err(err) => {
                for (target, _) in &sections {
                    engine::release_target(*target);
                }
                engine::release_target(container);
                return Err(err.into());
            }
        };

        let sections = sections
            .into_iter()
            .map(|(target, preset)| {
                let reveal = reveal::attach_scoped(
                    target,
                    preset.items.len(),
                    preset.reveal.to_config(),
                );
                MountedSection {
                    target,
                    preset,
                    reveal,
                }
            })
            .collect();

        let page = Self {
            name: preset.name.clone(),
            gap: preset.gap,
            container,
            sections,
            layout,
            width,
            height,
            mounted: true,
        };

        tracing::debug!(
            page = %page.name,
            sections = page.sections.len(),
            content_height = page.layout.content_height,
            "page mounted"
        );

        page.refresh();
        Ok(page)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sections(&self) -> &[MountedSection] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&MountedSection> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn layout(&self) -> &ComputedLayout {
        &self.layout
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn scroll_offset(&self) -> u16 {
        scroll::get_scroll_offset(self.container)
    }

    /// What is currently on screen.
    pub fn viewport(&self) -> Viewport {
        scroll::viewport_of(self.container, self.height)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // -------------------------------------------------------------------------
    // Frame loop
    // -------------------------------------------------------------------------

    /// Fire due reveal timers. Returns the number fired.
    pub fn tick(&self) -> usize {
        if !self.mounted {
            return 0;
        }
        timers::run_due_timers()
    }

    fn refresh(&self) {
        viewport::refresh_viewport(&self.layout, self.viewport());
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    fn after_scroll(&self, moved: bool) -> bool {
        if moved {
            self.refresh();
        }
        moved
    }

    /// Scroll by `delta` rows. Returns `true` if the page moved.
    pub fn scroll_by(&self, delta: i32) -> bool {
        let moved = scroll::scroll_by(&self.layout, self.container, self.height, delta);
        self.after_scroll(moved)
    }

    /// Scroll so row `y` is at the top (clamped).
    pub fn scroll_to(&self, y: u16) -> bool {
        let moved = scroll::set_scroll_offset(&self.layout, self.container, self.height, y);
        self.after_scroll(moved)
    }

    pub fn page_down(&self) -> bool {
        self.scroll_by(scroll::page_scroll_amount(self.height))
    }

    pub fn page_up(&self) -> bool {
        self.scroll_by(-scroll::page_scroll_amount(self.height))
    }

    pub fn scroll_to_top(&self) -> bool {
        let moved = scroll::scroll_to_top(&self.layout, self.container, self.height);
        self.after_scroll(moved)
    }

    pub fn scroll_to_bottom(&self) -> bool {
        let moved = scroll::scroll_to_bottom(&self.layout, self.container, self.height);
        self.after_scroll(moved)
    }

    /// Bring a section's first row to the top of the viewport.
    ///
    /// Returns `false` for unknown ids or if the page did not move.
    pub fn scroll_to_section(&self, id: &str) -> bool {
        let Some(bounds) = self.section(id).and_then(|s| self.layout.bounds(s.target)) else {
            return false;
        };
        self.scroll_to(bounds.y)
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Relayout for a new viewport size.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), PageError> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        let sections: Vec<(usize, SectionPreset)> = self
            .sections
            .iter()
            .map(|s| (s.target, s.preset.clone()))
            .collect();
        let nodes = page_nodes(&sections, height);
        self.layout = compute_page_layout(&nodes, width, self.gap)?;
        self.width = width;
        self.height = height;

        scroll::clamp_scroll(&self.layout, self.container, self.height);
        tracing::debug!(page = %self.name, width, height, "page resized");
        self.refresh();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Unmount
    // -------------------------------------------------------------------------

    /// Release every section; their sequencers detach.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;

        for section in &self.sections {
            engine::release_target(section.target);
        }
        scroll::clear_scroll(self.container);
        engine::release_target(self.container);

        tracing::debug!(page = %self.name, "page unmounted");
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn page_nodes(sections: &[(usize, SectionPreset)], height: u16) -> Vec<PageNode> {
    sections
        .iter()
        .map(|(target, preset)| {
            PageNode::new(*target, preset.content_rows()).with_min_rows(preset.min_rows_for(height))
        })
        .collect()
}
