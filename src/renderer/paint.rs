//! Paint a mounted page into a frame.
//!
//! Each section paints top to bottom:
//!
//! ```text
//! Title              hidden until the section is visible
//!                    spacer
//! body lines         hidden until the section is visible
//! • revealed item
//! ··········         dim placeholder for items not yet revealed
//! ```
//!
//! Sections with `level_bars` paint revealed `"Label  NN%"` items as a
//! proportional bar:
//!
//! ```text
//! • Rust    ██████████░░░░░░░░░░ 50%
//! ```

use crate::pipeline::{MountedSection, Page};
use crate::types::{Attr, Rgba};

use super::buffer::FrameBuffer;

/// Left margin of section content.
pub const INDENT: u16 = 2;

/// Width of a level bar in cells.
pub const LEVEL_BAR_WIDTH: u16 = 20;

/// Paint what is currently on screen.
pub fn paint_page(page: &Page) -> FrameBuffer {
    let mut buffer = FrameBuffer::new(page.width(), page.height());
    let viewport = page.viewport();

    for section in page.sections() {
        let Some(bounds) = page.layout().bounds(section.target()) else {
            continue;
        };
        if viewport.visible_rows(&bounds) == 0 {
            continue;
        }
        let top = bounds.y as i32 - viewport.scroll_y as i32;
        paint_section(&mut buffer, section, top);
    }

    buffer
}

/// Section-relative row, clipped to the frame.
struct Pen<'a> {
    buffer: &'a mut FrameBuffer,
    top: i32,
}

impl Pen<'_> {
    fn put(&mut self, line: usize, x: u16, text: &str, fg: Rgba, attrs: Attr) -> u16 {
        let y = self.top + line as i32;
        if !(0..self.buffer.height() as i32).contains(&y) {
            return 0;
        }
        self.buffer.draw_text(x, y as u16, text, fg, attrs)
    }
}

fn paint_section(buffer: &mut FrameBuffer, section: &MountedSection, top: i32) {
    let preset = section.preset();
    let reveal = section.reveal();
    let mut pen = Pen { buffer, top };

    if reveal.section_visible() {
        pen.put(0, INDENT, &preset.title, Rgba::ACCENT, Attr::BOLD);
        for (i, body) in preset.body.iter().enumerate() {
            pen.put(2 + i, INDENT, body, Rgba::TERMINAL_DEFAULT, Attr::NONE);
        }
    }

    let label_width = if preset.level_bars {
        preset
            .items
            .iter()
            .filter_map(|item| split_level(item))
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0)
    } else {
        0
    };

    let first_item = 2 + preset.body.len();
    for (i, item) in preset.items.iter().enumerate() {
        let line = first_item + i;
        if !reveal.is_revealed(i) {
            let placeholder = "·".repeat(item.chars().count() + 2);
            pen.put(line, INDENT, &placeholder, Rgba::GRAY, Attr::DIM);
            continue;
        }
        match split_level(item).filter(|_| preset.level_bars) {
            Some((label, level)) => paint_level(&mut pen, line, label, label_width, level),
            None => {
                pen.put(line, INDENT, &format!("• {item}"), Rgba::WHITE, Attr::NONE);
            }
        }
    }
}

fn paint_level(pen: &mut Pen<'_>, line: usize, label: &str, label_width: usize, level: u8) {
    let text = format!("• {label:<label_width$}  ");
    let bar_x = INDENT.saturating_add(pen.put(line, INDENT, &text, Rgba::WHITE, Attr::NONE));

    let filled = ((level as u32 * LEVEL_BAR_WIDTH as u32 + 50) / 100) as u16;
    let empty = LEVEL_BAR_WIDTH - filled;
    pen.put(line, bar_x, &"█".repeat(filled as usize), Rgba::ACCENT, Attr::NONE);
    pen.put(
        line,
        bar_x.saturating_add(filled),
        &"░".repeat(empty as usize),
        Rgba::GRAY,
        Attr::DIM,
    );
    pen.put(
        line,
        bar_x.saturating_add(LEVEL_BAR_WIDTH),
        &format!(" {level}%"),
        Rgba::WHITE,
        Attr::NONE,
    );
}

/// Split `"Label   NN%"` into the label and a level clamped to 100.
fn split_level(item: &str) -> Option<(&str, u8)> {
    let (label, level) = item.trim_end().rsplit_once(char::is_whitespace)?;
    let level: u8 = level.strip_suffix('%')?.parse().ok()?;
    let label = label.trim_end();
    if label.is_empty() {
        return None;
    }
    Some((label, level.min(100)))
}
