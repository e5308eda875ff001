#![forbid(unsafe_code)]

//! The fixed color-pair palette.
//!
//! The toolkit styles every cell with one of a small set of
//! foreground/background pairs rather than free-form colors. The pairs
//! map onto [`crossterm::style::Colors`] at presentation time, so the
//! escape-sequence encoding stays in the backend.

use crossterm::style::{Color, Colors};

/// A foreground/background color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorPair {
    /// Normal text.
    #[default]
    WhiteBlack,
    /// Prompts and accents.
    CyanBlack,
    /// Errors and warnings.
    RedBlack,
    /// The text-input cursor cell.
    BlackWhite,
    /// Emphasis.
    YellowBlack,
    /// The highlighted row/cell/button.
    BlackYellow,
    /// Error banners.
    BlackRed,
}

impl ColorPair {
    /// The pair used to paint the highlighted row, cell, or button.
    pub const HILIGHT: ColorPair = ColorPair::BlackYellow;

    /// Resolve into concrete terminal colors.
    #[must_use]
    pub const fn colors(&self) -> Colors {
        let (fg, bg) = match self {
            ColorPair::WhiteBlack => (Color::White, Color::Black),
            ColorPair::CyanBlack => (Color::Cyan, Color::Black),
            ColorPair::RedBlack => (Color::Red, Color::Black),
            ColorPair::BlackWhite => (Color::Black, Color::White),
            ColorPair::YellowBlack => (Color::Yellow, Color::Black),
            ColorPair::BlackYellow => (Color::Black, Color::Yellow),
            ColorPair::BlackRed => (Color::Black, Color::Red),
        };
        Colors {
            foreground: Some(fg),
            background: Some(bg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal_text() {
        assert_eq!(ColorPair::default(), ColorPair::WhiteBlack);
    }

    #[test]
    fn hilight_is_black_on_yellow() {
        let colors = ColorPair::HILIGHT.colors();
        assert_eq!(colors.foreground, Some(Color::Black));
        assert_eq!(colors.background, Some(Color::Yellow));
    }

    #[test]
    fn every_pair_resolves_both_colors() {
        for pair in [
            ColorPair::WhiteBlack,
            ColorPair::CyanBlack,
            ColorPair::RedBlack,
            ColorPair::BlackWhite,
            ColorPair::YellowBlack,
            ColorPair::BlackYellow,
            ColorPair::BlackRed,
        ] {
            let colors = pair.colors();
            assert!(colors.foreground.is_some());
            assert!(colors.background.is_some());
        }
    }
}
