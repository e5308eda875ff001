#![forbid(unsafe_code)]

//! Scrollable list panel with keyboard navigation.
//!
//! Navigation is a pure function of the previous selection state and the
//! key pressed: a proposed `(row, col, top)` is computed, then clamped.
//! Invariant: after every keystroke the highlighted row lies inside the
//! visible window `[top, top + content_height)`.

use shoji_core::error::Error;
use shoji_core::geometry::PanelExtents;
use shoji_core::keys::Key;

use crate::panel::Panel;
use crate::row::Row;

/// What ended a modal `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Highlighted row index at the stop key.
    pub row: usize,
    /// Highlighted column index at the stop key.
    pub col: usize,
    /// Text of the highlighted column.
    pub text: String,
    /// The stop key that ended the loop.
    pub key: Key,
}

/// A [`Panel`] specialized for picking one row (or cell) from a list.
pub struct ScrollingPanel {
    panel: Panel,
}

impl ScrollingPanel {
    #[must_use]
    pub fn new<I, R>(screen: &shoji_render::screen::Screen, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        Self {
            panel: Panel::new(screen, rows),
        }
    }

    /// Wrap an already-configured panel.
    #[must_use]
    pub fn from_panel(panel: Panel) -> Self {
        Self { panel }
    }

    #[must_use]
    pub fn with_extents(mut self, extents: PanelExtents) -> Self {
        self.panel = self.panel.with_extents(extents);
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<Row>) -> Self {
        self.panel = self.panel.with_header(header);
        self
    }

    #[must_use]
    pub fn with_grid_cells(mut self, grid: bool) -> Self {
        self.panel = self.panel.with_grid_cells(grid);
        self
    }

    #[must_use]
    pub fn with_inner_padding(mut self, padding: u16) -> Self {
        self.panel = self.panel.with_inner_padding(padding);
        self
    }

    #[must_use]
    pub fn with_hilighted_row(mut self, row: Option<usize>) -> Self {
        self.panel = self.panel.with_hilighted_row(row);
        self
    }

    #[must_use]
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    #[must_use]
    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    /// Apply one navigation keystroke to the selection state.
    ///
    /// Non-navigation keys are ignored. Left/Right wrap within the
    /// current row's columns, but only when the row did not change on
    /// this same keystroke; moving to a shorter row clamps the column to
    /// its last index.
    pub fn handle_key(&mut self, key: Key) {
        if !key.is_navigation() || self.panel.rows().is_empty() {
            return;
        }
        let num_rows = self.panel.rows().len() as isize;
        let page = self.panel.content_height() as isize;
        let prev_row = self.panel.hilighted_row().unwrap_or(0) as isize;
        let mut row = prev_row;
        let mut col = self.panel.hilighted_col() as isize;
        let mut top = self.panel.top_visible() as isize;

        match key {
            Key::Up => row -= 1,
            Key::Down => row += 1,
            Key::Left => col -= 1,
            Key::Right => col += 1,
            Key::PageUp => {
                // First jump to the top of the window, then page.
                if row > top {
                    row = top;
                } else {
                    row -= page;
                }
            }
            Key::PageDown => {
                if row < top + page - 1 {
                    row = top + page - 1;
                } else {
                    row += page;
                }
            }
            Key::Home => {
                row = 0;
                col = 0;
            }
            Key::End => {
                row = num_rows - 1;
                col = 0;
            }
            _ => return,
        }

        row = row.clamp(0, num_rows - 1);

        // Re-anchor the window so it contains the highlighted row.
        if row < top {
            top = row;
        } else if row >= top + page {
            top = row - page + 1;
        }
        top = top.clamp(0, num_rows - 1);

        let row_cols = self.panel.rows()[row as usize].columns().len().max(1) as isize;
        if row != prev_row {
            col = col.min(row_cols - 1).max(0);
        } else if col < 0 {
            col = row_cols - 1;
        } else if col >= row_cols {
            col = 0;
        }

        self.panel
            .set_selection(Some(row as usize), col as usize, top as usize);
    }

    /// Modal loop: show, repaint after each keystroke, and return when a
    /// stop key is pressed.
    pub fn run(&mut self, stop_keys: &[Key]) -> Result<RunResult, Error> {
        self.panel.show()?;
        loop {
            self.panel.sync()?;
            let key = self.panel.screen().read_key()?;
            if key.is_navigation() {
                self.handle_key(key);
            } else if stop_keys.contains(&key) {
                let row = self.panel.hilighted_row().unwrap_or(0);
                let col = self.panel.hilighted_col();
                let text = self
                    .panel
                    .rows()
                    .get(row)
                    .and_then(|r| r.columns().get(col))
                    .map(|c| c.text().to_owned())
                    .unwrap_or_default();
                return Ok(RunResult {
                    row,
                    col,
                    text,
                    key,
                });
            }
        }
    }

    /// Repeat `run` with the default stop keys until the operator
    /// confirms a row (`Some(index)`) or cancels (`None`).
    pub fn pick_a_line_or_cancel(&mut self) -> Result<Option<usize>, Error> {
        loop {
            let result = self.run(Key::STOP_DEFAULT)?;
            match result.key {
                Key::Escape => return Ok(None),
                Key::Enter => return Ok(Some(result.row)),
                _ => {}
            }
        }
    }

    pub fn show(&mut self) -> Result<(), Error> {
        self.panel.show()
    }

    pub fn hide(&mut self) -> Result<(), Error> {
        self.panel.hide()
    }

    pub fn set_rows<I, R>(&mut self, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        self.panel.set_rows(rows);
    }

    /// Replace rows and restore a highlight (used by editors that
    /// rebuild their row set after a mutation).
    pub fn set_rows_keeping<I, R>(&mut self, rows: I, hilighted_row: usize)
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        self.panel.set_rows(rows);
        self.panel.set_hilighted_row(Some(hilighted_row), None);
    }
}
