//! FrameBuffer - the grid of cells one frame paints into.
//!
//! Flat row-major storage: `index = y * width + x`. Every character takes
//! one column.

use crate::types::{Attr, Cell, Rgba};

/// A 2D buffer of terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Cell at `(x, y)`, or `None` out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Write `text` starting at `(x, y)`, clipped to the buffer width.
    ///
    /// Returns the number of columns written.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, attrs: Attr) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut written = 0;
        for (col, ch) in (x..self.width).zip(text.chars()) {
            let idx = self.index(col, y);
            let cell = &mut self.cells[idx];
            cell.char = ch;
            cell.fg = fg;
            cell.attrs = attrs;
            written += 1;
        }
        written
    }

    /// Characters of row `y`, trailing blanks trimmed.
    pub fn line(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        let row = &self.cells[start..start + self.width as usize];
        let text: String = row.iter().map(|c| c.char).collect();
        text.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_blank() {
        let buffer = FrameBuffer::new(4, 2);
        assert_eq!(buffer.get(3, 1), Some(&Cell::default()));
        assert_eq!(buffer.get(4, 0), None);
        assert_eq!(buffer.line(0), "");
    }

    #[test]
    fn test_draw_text_clips() {
        let mut buffer = FrameBuffer::new(6, 1);
        let written = buffer.draw_text(2, 0, "hello", Rgba::WHITE, Attr::BOLD);

        assert_eq!(written, 4);
        assert_eq!(buffer.line(0), "  hell");
        assert_eq!(buffer.get(2, 0).unwrap().attrs, Attr::BOLD);
        assert_eq!(buffer.draw_text(0, 1, "x", Rgba::WHITE, Attr::NONE), 0);
    }

    #[test]
    fn test_clear() {
        let mut buffer = FrameBuffer::new(3, 1);
        buffer.draw_text(0, 0, "abc", Rgba::GRAY, Attr::DIM);
        buffer.clear();
        assert_eq!(buffer, FrameBuffer::new(3, 1));
    }
}
