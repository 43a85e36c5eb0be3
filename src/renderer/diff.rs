//! Differential renderer for fullscreen mode.
//!
//! Compares each frame to the previous one and only writes cells that
//! changed, wrapped in a synchronized update so the terminal paints the
//! frame at once.
//!
//! # Algorithm
//!
//! 1. Begin synchronized update
//! 2. For each changed cell: move the cursor if it is not already there,
//!    emit style changes, print the character
//! 3. End synchronized update and flush
//! 4. Keep the frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};

use super::buffer::FrameBuffer;
use crate::types::{Attr, Cell, Rgba};

/// Style currently active on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Style {
    fg: Rgba,
    bg: Rgba,
    attrs: Attr,
}

impl Style {
    fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// Differential renderer writing crossterm commands to `W`.
pub struct DiffRenderer<W: Write> {
    out: W,
    previous: Option<FrameBuffer>,
    style: Option<Style>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: None,
            style: None,
            cursor: None,
        }
    }

    /// Render a frame, writing only changed cells.
    ///
    /// Returns `true` if any cell changed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let previous = self
            .previous
            .take()
            .filter(|prev| prev.width() == buffer.width() && prev.height() == buffer.height());

        queue!(self.out, BeginSynchronizedUpdate)?;
        self.cursor = None;

        let mut has_changes = false;
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                let changed = match &previous {
                    Some(prev) => prev.get(x, y) != Some(cell),
                    None => true,
                };
                if changed {
                    has_changes = true;
                    self.write_cell(x, y, cell)?;
                }
            }
        }

        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Force a full redraw (no diffing).
    ///
    /// Use this after a resize or when the screen is corrupted.
    pub fn render_full(&mut self, buffer: &FrameBuffer) -> io::Result<()> {
        self.invalidate();
        self.render(buffer).map(|_| ())
    }

    fn write_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            queue!(self.out, MoveTo(x, y))?;
        }

        let next = Style::of(cell);
        if self.style != Some(next) {
            self.apply_style(next)?;
        }

        queue!(self.out, Print(cell.char))?;
        self.cursor = Some((x.saturating_add(1), y));
        Ok(())
    }

    fn apply_style(&mut self, next: Style) -> io::Result<()> {
        let current = self.style;

        // Attribute reset also clears colors
        let reset = current.is_none_or(|c| c.attrs != next.attrs);
        if reset {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            for (flag, attribute) in [
                (Attr::BOLD, Attribute::Bold),
                (Attr::DIM, Attribute::Dim),
                (Attr::ITALIC, Attribute::Italic),
                (Attr::UNDERLINE, Attribute::Underlined),
            ] {
                if next.attrs.contains(flag) {
                    queue!(self.out, SetAttribute(attribute))?;
                }
            }
        }
        if reset || current.is_some_and(|c| c.fg != next.fg) {
            queue!(self.out, SetForegroundColor(to_color(next.fg)))?;
        }
        if reset || current.is_some_and(|c| c.bg != next.bg) {
            queue!(self.out, SetBackgroundColor(to_color(next.bg)))?;
        }

        self.style = Some(next);
        Ok(())
    }

    /// Drop the previous frame; the next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
        self.style = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter the alternate screen with a hidden cursor.
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        queue!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            Show,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    pub fn enable_mouse(&mut self) -> io::Result<()> {
        queue!(self.out, EnableMouseCapture)?;
        self.out.flush()
    }

    pub fn disable_mouse(&mut self) -> io::Result<()> {
        queue!(self.out, DisableMouseCapture)?;
        self.out.flush()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(8, 2);
        buffer.draw_text(0, 0, text, Rgba::WHITE, Attr::NONE);
        buffer
    }

    fn output(renderer: &mut DiffRenderer<Vec<u8>>) -> String {
        let text = String::from_utf8_lossy(renderer.writer()).into_owned();
        renderer.writer_mut().clear();
        text
    }

    #[test]
    fn test_first_render_writes_everything() {
        let mut renderer = DiffRenderer::new(Vec::<u8>::new());
        assert!(!renderer.has_previous());

        assert!(renderer.render(&frame("hello")).unwrap());
        let out = output(&mut renderer);
        assert!(out.contains("hello"));
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_unchanged_frame_writes_no_cells() {
        let mut renderer = DiffRenderer::new(Vec::<u8>::new());
        renderer.render(&frame("hello")).unwrap();
        output(&mut renderer);

        assert!(!renderer.render(&frame("hello")).unwrap());
        let out = output(&mut renderer);
        assert!(!out.contains("hello"));
        assert!(!out.contains("\x1b[1;1H"));
    }

    #[test]
    fn test_only_changed_cells_written() {
        let mut renderer = DiffRenderer::new(Vec::<u8>::new());
        renderer.render(&frame("hello")).unwrap();
        output(&mut renderer);

        assert!(renderer.render(&frame("hellx")).unwrap());
        let out = output(&mut renderer);
        assert!(out.contains("\x1b[1;5H"));
        assert!(out.contains('x'));
        assert!(!out.contains("hell"));
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = DiffRenderer::new(Vec::<u8>::new());
        renderer.render(&frame("hello")).unwrap();
        output(&mut renderer);

        renderer.invalidate();
        assert!(!renderer.has_previous());
        renderer.render(&frame("hello")).unwrap();
        assert!(output(&mut renderer).contains("hello"));
    }

    #[test]
    fn test_to_color() {
        assert_eq!(to_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(to_color(Rgba::rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
