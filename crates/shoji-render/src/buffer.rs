#![forbid(unsafe_code)]

//! A fixed-size grid of cells with clipped drawing primitives.
//!
//! Buffers deliberately stay simple: text is clipped, never wrapped, and
//! wide characters occupy a head cell plus blank continuation cells.
//! Display-width math only, no grapheme shaping.

use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use shoji_core::style::ColorPair;

/// Box-drawing characters for panel borders and rules.
pub mod glyphs {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const TOP_LEFT: char = '┌';
    pub const TOP_RIGHT: char = '┐';
    pub const BOTTOM_LEFT: char = '└';
    pub const BOTTOM_RIGHT: char = '┘';
}

/// A 2D grid of [`Cell`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a blank buffer.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Cell at a position, or `None` outside the buffer.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Write a cell; writes outside the buffer are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Reset every cell to blank.
    pub fn erase(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Paint `width` blank cells starting at `(x, y)`.
    pub fn fill_row(&mut self, x: u16, y: u16, width: u16, color: ColorPair) {
        for dx in 0..width {
            self.set(x.saturating_add(dx), y, Cell::blank(color));
        }
    }

    /// Print text left-to-right from `(x, y)`, clipping at `max_x`
    /// (exclusive). Returns the x position after the last painted cell.
    ///
    /// A wide character that would straddle `max_x` is not painted.
    pub fn print_clipped(&mut self, x: u16, y: u16, text: &str, color: ColorPair, max_x: u16) -> u16 {
        let mut x = x;
        let max_x = max_x.min(self.width);
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if x.saturating_add(w) > max_x {
                break;
            }
            self.set(x, y, Cell::new(ch, color));
            for dx in 1..w {
                self.set(x + dx, y, Cell::blank(color));
            }
            x += w;
        }
        x
    }

    /// Draw a horizontal rule of `width` cells starting at `(x, y)`.
    pub fn hline(&mut self, x: u16, y: u16, width: u16, color: ColorPair) {
        for dx in 0..width {
            self.set(
                x.saturating_add(dx),
                y,
                Cell::new(glyphs::HORIZONTAL, color),
            );
        }
    }

    /// Draw a border around the full buffer.
    pub fn draw_border(&mut self, color: ColorPair) {
        if self.width < 2 || self.height < 2 {
            return;
        }
        let right = self.width - 1;
        let bottom = self.height - 1;
        for x in 1..right {
            self.set(x, 0, Cell::new(glyphs::HORIZONTAL, color));
            self.set(x, bottom, Cell::new(glyphs::HORIZONTAL, color));
        }
        for y in 1..bottom {
            self.set(0, y, Cell::new(glyphs::VERTICAL, color));
            self.set(right, y, Cell::new(glyphs::VERTICAL, color));
        }
        self.set(0, 0, Cell::new(glyphs::TOP_LEFT, color));
        self.set(right, 0, Cell::new(glyphs::TOP_RIGHT, color));
        self.set(0, bottom, Cell::new(glyphs::BOTTOM_LEFT, color));
        self.set(right, bottom, Cell::new(glyphs::BOTTOM_RIGHT, color));
    }

    /// Render each row as a plain string (characters only, no colors).
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.get(x, y).map_or(' ', |c| c.ch))
                    .collect()
            })
            .collect()
    }
}
