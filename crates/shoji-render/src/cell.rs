#![forbid(unsafe_code)]

//! A single character cell.

use shoji_core::style::ColorPair;

/// One terminal cell: a character plus its color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: ColorPair,
}

impl Cell {
    /// A blank cell in the normal palette.
    pub const BLANK: Cell = Cell {
        ch: ' ',
        color: ColorPair::WhiteBlack,
    };

    /// Create a cell with the default color pair.
    #[must_use]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            color: ColorPair::WhiteBlack,
        }
    }

    /// Create a cell with an explicit color pair.
    #[must_use]
    pub const fn new(ch: char, color: ColorPair) -> Self {
        Self { ch, color }
    }

    /// A blank cell carrying the given color pair.
    #[must_use]
    pub const fn blank(color: ColorPair) -> Self {
        Self { ch: ' ', color }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}
