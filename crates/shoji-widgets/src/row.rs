#![forbid(unsafe_code)]

//! Tabular row content.
//!
//! Every panel renders an ordered list of [`Row`]s; a row is an ordered
//! list of [`Column`]s carrying text, a display width, and a color.
//! Columns are immutable value types stored by value, so mutating a
//! caller's copy after insertion cannot corrupt rendered state.

use unicode_width::UnicodeWidthStr;

use shoji_core::style::ColorPair;

/// One cell of tabular content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    text: String,
    width: u16,
    color: ColorPair,
}

impl Column {
    /// Column with the default color; width defaults to the text's
    /// display width.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::styled(text, ColorPair::WhiteBlack)
    }

    /// Column with an explicit color.
    #[must_use]
    pub fn styled(text: impl Into<String>, color: ColorPair) -> Self {
        let text = text.into();
        let width = clamp_width(text.width());
        Self { text, width, color }
    }

    /// Override the display width (for fixed-width table layouts).
    #[must_use]
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn color(&self) -> ColorPair {
        self.color
    }
}

/// An ordered sequence of columns, or a horizontal-rule separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    columns: Vec<Column>,
    rule: bool,
}

impl Row {
    /// Build a row from anything convertible: a string, a column, or a
    /// list of either.
    #[must_use]
    pub fn new(content: impl Into<Row>) -> Self {
        content.into()
    }

    /// A separator row, rendered as a horizontal rule spanning the
    /// content width.
    #[must_use]
    pub fn horizontal_line() -> Self {
        Self {
            columns: vec![Column::new("")],
            rule: true,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Whether this row renders as a horizontal rule.
    #[must_use]
    pub const fn is_rule(&self) -> bool {
        self.rule
    }
}

impl From<&str> for Row {
    fn from(text: &str) -> Self {
        Self {
            columns: vec![Column::new(text)],
            rule: false,
        }
    }
}

impl From<String> for Row {
    fn from(text: String) -> Self {
        Self {
            columns: vec![Column::new(text)],
            rule: false,
        }
    }
}

impl From<(&str, ColorPair)> for Row {
    fn from((text, color): (&str, ColorPair)) -> Self {
        Self {
            columns: vec![Column::styled(text, color)],
            rule: false,
        }
    }
}

impl From<(String, ColorPair)> for Row {
    fn from((text, color): (String, ColorPair)) -> Self {
        Self {
            columns: vec![Column::styled(text, color)],
            rule: false,
        }
    }
}

impl From<Column> for Row {
    fn from(column: Column) -> Self {
        Self {
            columns: vec![column],
            rule: false,
        }
    }
}

impl From<Vec<Column>> for Row {
    fn from(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rule: false,
        }
    }
}

impl From<Vec<&str>> for Row {
    fn from(texts: Vec<&str>) -> Self {
        Self {
            columns: texts.into_iter().map(Column::new).collect(),
            rule: false,
        }
    }
}

impl From<Vec<String>> for Row {
    fn from(texts: Vec<String>) -> Self {
        Self {
            columns: texts.into_iter().map(Column::new).collect(),
            rule: false,
        }
    }
}

pub(crate) fn clamp_width(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}
