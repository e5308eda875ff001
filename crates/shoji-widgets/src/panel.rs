#![forbid(unsafe_code)]

//! The base retained-mode panel.
//!
//! A panel owns one compositor surface plus the row set, header, and
//! selection state rendered into it. It tracks a dirty flag so `render`
//! is a no-op unless something changed; `show` and `hide` restack the
//! surface and flush the whole screen. Geometry is declarative
//! ([`PanelExtents`]) and recomputed whenever content changes, because
//! auto-sizing depends on the rows.
//!
//! The content rectangle is always fully painted, including blank filler
//! lines past the end of the row set, so a shorter row set never leaves
//! stale glyphs behind.

use shoji_core::error::Error;
use shoji_core::geometry::{PanelExtents, Rect};
use shoji_core::style::ColorPair;
use shoji_render::buffer::Buffer;
use shoji_render::compositor::SurfaceId;
use shoji_render::screen::Screen;

use crate::row::{Row, clamp_width};

/// How one rendered row is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Highlight {
    None,
    /// Whole row inverted.
    Row,
    /// Only this column index inverted (grid-cell selection).
    Cell(usize),
}

/// A rectangular retained-mode widget with rows, an optional header,
/// and damage tracking.
pub struct Panel {
    screen: Screen,
    surface: SurfaceId,
    extents: PanelExtents,
    draw_border: bool,
    select_grid_cells: bool,
    inner_padding: u16,

    rows: Vec<Row>,
    header: Option<Row>,
    column_widths: Vec<u16>,
    rows_max_width: u16,

    hilighted_row: Option<usize>,
    hilighted_col: usize,
    top_visible: usize,

    rect: Rect,
    content_top: u16,
    content_left: u16,
    content_right: u16,
    content_width: u16,
    content_height: u16,

    needs_render: bool,
    visible: bool,
}

impl Panel {
    /// Create a hidden panel with an initial row set, centered and
    /// auto-sized. Call `show()` (or a modal `run`) to display it.
    #[must_use]
    pub fn new<I, R>(screen: &Screen, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        let surface = screen.create_surface(Rect::default());
        let mut panel = Self {
            screen: screen.clone(),
            surface,
            extents: PanelExtents::auto(),
            draw_border: true,
            select_grid_cells: false,
            inner_padding: 0,
            rows: Vec::new(),
            header: None,
            column_widths: Vec::new(),
            rows_max_width: 0,
            hilighted_row: Some(0),
            hilighted_col: 0,
            top_visible: 0,
            rect: Rect::default(),
            content_top: 0,
            content_left: 0,
            content_right: 0,
            content_width: 0,
            content_height: 0,
            needs_render: true,
            visible: false,
        };
        panel.set_rows(rows);
        panel
    }

    /// Explicit geometry instead of centered/auto.
    #[must_use]
    pub fn with_extents(mut self, extents: PanelExtents) -> Self {
        self.extents = extents;
        self.update_layout();
        self
    }

    /// Header row pinned above the scrolling content.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<Row>) -> Self {
        self.header = Some(header.into());
        self.recompute();
        self
    }

    #[must_use]
    pub fn with_border(mut self, draw_border: bool) -> Self {
        self.draw_border = draw_border;
        self.needs_render = true;
        self
    }

    /// Highlight a single cell instead of the whole row.
    #[must_use]
    pub fn with_grid_cells(mut self, select_grid_cells: bool) -> Self {
        self.select_grid_cells = select_grid_cells;
        self.needs_render = true;
        self
    }

    /// Blank cells inserted between adjacent columns.
    #[must_use]
    pub fn with_inner_padding(mut self, inner_padding: u16) -> Self {
        self.inner_padding = inner_padding;
        self.recompute();
        self
    }

    /// Initial highlight; `None` renders with no highlighted row.
    #[must_use]
    pub fn with_hilighted_row(mut self, row: Option<usize>) -> Self {
        self.set_hilighted_row(row, None);
        self
    }

    /// Replace the row set.
    ///
    /// Recomputes column widths and geometry, scrolls back to the top,
    /// clamps the highlighted row to the new count, and resets the
    /// highlighted column.
    pub fn set_rows<I, R>(&mut self, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        self.rows = rows.into_iter().map(Into::into).collect();
        self.top_visible = 0;
        self.hilighted_col = 0;
        if let Some(row) = self.hilighted_row
            && row >= self.rows.len()
        {
            self.hilighted_row = Some(self.rows.len().saturating_sub(1));
        }
        self.recompute();
    }

    /// Replace the header row (`None` removes it).
    pub fn set_header(&mut self, header: Option<Row>) {
        self.header = header;
        self.recompute();
    }

    /// Move the highlight, optionally re-anchoring the visible window.
    pub fn set_hilighted_row(&mut self, row: Option<usize>, top_visible: Option<usize>) {
        let row = row.map(|r| r.min(self.rows.len().saturating_sub(1)));
        if self.hilighted_row != row {
            self.hilighted_row = row;
            self.needs_render = true;
        }
        if let Some(top) = top_visible
            && self.top_visible != top
        {
            self.top_visible = top;
            self.needs_render = true;
        }
    }

    /// Update the full selection at once, marking dirty only on change.
    pub(crate) fn set_selection(&mut self, row: Option<usize>, col: usize, top: usize) {
        if self.hilighted_row != row || self.hilighted_col != col || self.top_visible != top {
            self.hilighted_row = row;
            self.hilighted_col = col;
            self.top_visible = top;
            self.needs_render = true;
        }
    }

    fn recompute(&mut self) {
        // Per-column max width across header and rows; rendering pads
        // every row to these shared widths for aligned tabular output.
        let mut widths: Vec<u16> = Vec::new();
        let header = self.header.iter().filter(|h| !h.is_rule());
        for row in header.chain(self.rows.iter()) {
            for (ci, column) in row.columns().iter().enumerate() {
                if ci < widths.len() {
                    widths[ci] = widths[ci].max(column.width());
                } else {
                    widths.push(column.width());
                }
            }
        }
        let total: u16 = widths.iter().fold(0, |acc, w| acc.saturating_add(*w));
        let gaps = clamp_width(widths.len().saturating_sub(1));
        self.rows_max_width = total.saturating_add(self.inner_padding.saturating_mul(gaps));
        self.column_widths = widths;
        self.update_layout();
    }

    fn update_layout(&mut self) {
        let (screen_width, screen_height) = self.screen.size();
        let header_rows = u16::from(self.header.is_some());
        // Auto height: rows plus border; auto width: widest row plus
        // border and one blank cell each side.
        let content_height_needed = clamp_width(self.rows.len())
            .saturating_add(2)
            .saturating_add(header_rows);
        let content_width_needed = self.rows_max_width.saturating_add(4);
        self.rect = self.extents.resolve(
            screen_width,
            screen_height,
            content_width_needed,
            content_height_needed,
        );
        self.screen.set_surface_rect(self.surface, self.rect);

        self.content_top = 1 + header_rows;
        self.content_left = 2;
        self.content_right = self.rect.width.saturating_sub(2);
        self.content_width = self.rect.width.saturating_sub(4);
        self.content_height = self.rect.height.saturating_sub(2 + header_rows);
        self.needs_render = true;
    }

    /// Paint into the surface if dirty (or `force`d).
    ///
    /// Returns whether a paint happened; callers flush the screen only
    /// when it did.
    pub fn render(&mut self, force: bool) -> bool {
        if !(force || self.needs_render) {
            return false;
        }

        let rows = &self.rows;
        let header = &self.header;
        let widths = &self.column_widths;
        let padding = self.inner_padding;
        let left = self.content_left;
        let right = self.content_right;
        let width = self.content_width;
        let top = self.content_top;
        let height = self.content_height;
        let top_visible = self.top_visible;
        let hilighted_row = self.hilighted_row;
        let hilighted_col = self.hilighted_col;
        let grid = self.select_grid_cells;
        let border = self.draw_border;

        self.screen.paint(self.surface, |buf| {
            buf.erase();
            if border {
                buf.draw_border(ColorPair::WhiteBlack);
            }
            if let Some(header) = header {
                if header.is_rule() {
                    buf.hline(left, 1, width, header.columns()[0].color());
                } else {
                    paint_columns(buf, 1, header, widths, padding, left, right, Highlight::None);
                }
            }
            for line in 0..height {
                let y = top + line;
                let Some(row) = rows.get(top_visible + line as usize) else {
                    // Filler line past the end of the row set.
                    buf.fill_row(left, y, width, ColorPair::WhiteBlack);
                    continue;
                };
                let highlighted = hilighted_row == Some(top_visible + line as usize);
                if row.is_rule() {
                    let color = if highlighted {
                        ColorPair::HILIGHT
                    } else {
                        row.columns()[0].color()
                    };
                    buf.hline(left, y, width, color);
                    continue;
                }
                let highlight = match (highlighted, grid) {
                    (false, _) => Highlight::None,
                    (true, false) => Highlight::Row,
                    (true, true) => Highlight::Cell(hilighted_col),
                };
                paint_columns(buf, y, row, widths, padding, left, right, highlight);
            }
        });

        self.needs_render = false;
        true
    }

    /// Render if dirty and flush only when a paint happened.
    pub fn sync(&mut self) -> Result<(), Error> {
        if self.render(false) {
            self.screen.flush()?;
        }
        Ok(())
    }

    /// Force a repaint and flush.
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.render(true);
        self.screen.flush()
    }

    /// Paint, raise to the top of the stack, and flush.
    pub fn show(&mut self) -> Result<(), Error> {
        self.render(true);
        self.visible = true;
        self.screen.show_surface(self.surface)
    }

    /// Lower off the stack and flush what was underneath.
    pub fn hide(&mut self) -> Result<(), Error> {
        self.visible = false;
        self.screen.hide_surface(self.surface)
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn hilighted_row(&self) -> Option<usize> {
        self.hilighted_row
    }

    #[must_use]
    pub const fn hilighted_col(&self) -> usize {
        self.hilighted_col
    }

    #[must_use]
    pub const fn top_visible(&self) -> usize {
        self.top_visible
    }

    /// Rows that fit in the content rectangle.
    #[must_use]
    pub const fn content_height(&self) -> u16 {
        self.content_height
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shared per-column widths used for rendering.
    #[must_use]
    pub fn column_widths(&self) -> &[u16] {
        &self.column_widths
    }

    #[must_use]
    pub const fn needs_render(&self) -> bool {
        self.needs_render
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        // Guarantees the surface is gone on every exit path, including
        // unwinding out of a modal loop.
        self.screen.remove_surface(self.surface);
        if self.visible {
            let _ = self.screen.flush();
        }
    }
}

/// Paint one row's columns left-to-right at shared widths.
///
/// A column overflowing the right content boundary is truncated and ends
/// the row; remaining columns are not drawn (clip, don't wrap). The last
/// column always stretches to the right boundary.
#[allow(clippy::too_many_arguments)]
fn paint_columns(
    buf: &mut Buffer,
    y: u16,
    row: &Row,
    widths: &[u16],
    padding: u16,
    left: u16,
    right: u16,
    highlight: Highlight,
) {
    let num_cols = widths.len();
    let mut x = left;
    for (ci, column) in row.columns().iter().enumerate() {
        let mut column_width = widths
            .get(ci)
            .copied()
            .unwrap_or_else(|| column.width())
            .saturating_add(padding);
        if x.saturating_add(column_width) > right || ci + 1 == num_cols {
            column_width = right.saturating_sub(x);
        }
        let color = match highlight {
            Highlight::None => column.color(),
            Highlight::Row => ColorPair::HILIGHT,
            Highlight::Cell(hc) if hc == ci => ColorPair::HILIGHT,
            Highlight::Cell(_) => column.color(),
        };
        buf.fill_row(x, y, column_width, color);
        buf.print_clipped(x, y, column.text(), color, x.saturating_add(column_width));
        x = x.saturating_add(column_width);
        if x >= right {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Column;
    use shoji_render::backend::{TestBackend, TestProbe};

    fn screen(width: u16, height: u16) -> (Screen, TestProbe) {
        let (backend, probe) = TestBackend::new(width, height);
        (Screen::new(Box::new(backend)).unwrap(), probe)
    }

    #[test]
    fn column_widths_are_per_index_maxima() {
        let (screen, _probe) = screen(80, 24);
        let panel = Panel::new(
            &screen,
            vec![
                Row::from(vec!["ab", "cdef"]),
                Row::from(vec!["abcdef", "gh", "i"]),
            ],
        );
        assert_eq!(panel.column_widths(), &[6, 4, 1]);
    }

    #[test]
    fn header_participates_in_column_widths() {
        let (screen, _probe) = screen(80, 24);
        let panel = Panel::new(&screen, vec![Row::from(vec!["a", "b"])])
            .with_header(vec!["Title", "Year"]);
        assert_eq!(panel.column_widths(), &[5, 4]);
    }

    #[test]
    fn auto_geometry_wraps_content_with_border() {
        let (screen, _probe) = screen(80, 24);
        let panel = Panel::new(&screen, vec!["abcde", "fg"]);
        // Height: 2 rows + border; width: widest row + border + spaces.
        assert_eq!(panel.rect().height, 4);
        assert_eq!(panel.rect().width, 9);
        // Centered.
        assert_eq!(panel.rect().x, (80 - 9) / 2);
        assert_eq!(panel.rect().y, (24 - 4) / 2);
    }

    #[test]
    fn oversized_content_clamps_to_screen() {
        let (screen, _probe) = screen(20, 6);
        let rows: Vec<String> = (0..50).map(|i| format!("row number {i}")).collect();
        let panel = Panel::new(&screen, rows);
        assert_eq!(panel.rect().height, 6);
        assert_eq!(panel.rect().width, 17);
    }

    #[test]
    fn show_paints_rows_with_highlight_filler_and_border() {
        let (screen, probe) = screen(20, 10);
        let mut panel = Panel::new(&screen, vec!["one", "two"])
            .with_extents(PanelExtents {
                height: shoji_core::geometry::Extent::Cells(5),
                ..PanelExtents::auto()
            });
        panel.show().unwrap();

        let lines = probe.last_lines();
        let rect = panel.rect();
        let row0 = &lines[rect.y as usize + 1];
        assert!(row0.contains("one"));
        // Filler line below the two rows is painted blank inside the border.
        let filler = &lines[rect.y as usize + 3];
        assert!(filler.contains('│'));
        assert!(!filler.contains("one") && !filler.contains("two"));

        let frame = probe.last_frame().unwrap();
        let highlight_cell = frame.get(rect.x + 2, rect.y + 1).unwrap();
        assert_eq!(highlight_cell.color, ColorPair::HILIGHT);
        let normal_cell = frame.get(rect.x + 2, rect.y + 2).unwrap();
        assert_eq!(normal_cell.color, ColorPair::WhiteBlack);
    }

    #[test]
    fn render_is_idempotent_until_mutation() {
        let (screen, probe) = screen(30, 10);
        let mut panel = Panel::new(&screen, vec!["a", "b", "c"]);
        panel.show().unwrap();
        assert_eq!(probe.present_count(), 1);

        // Clean panel: sync paints nothing and flushes nothing.
        panel.sync().unwrap();
        panel.sync().unwrap();
        assert_eq!(probe.present_count(), 1);

        // A mutation re-arms exactly one paint.
        panel.set_hilighted_row(Some(2), None);
        panel.sync().unwrap();
        panel.sync().unwrap();
        assert_eq!(probe.present_count(), 2);

        // Forced render always repaints.
        panel.refresh().unwrap();
        assert_eq!(probe.present_count(), 3);
    }

    #[test]
    fn set_rows_resets_scroll_and_clamps_highlight() {
        let (screen, _probe) = screen(30, 8);
        let mut panel = Panel::new(&screen, (0..20).map(|i| format!("r{i}")));
        panel.set_selection(Some(15), 0, 12);
        panel.set_rows(vec!["only", "four", "rows", "now"]);
        assert_eq!(panel.top_visible(), 0);
        assert_eq!(panel.hilighted_row(), Some(3));
        assert_eq!(panel.hilighted_col(), 0);
    }

    #[test]
    fn shorter_row_set_leaves_no_stale_text() {
        let (screen, probe) = screen(30, 12);
        let mut panel = Panel::new(&screen, vec!["a long first line", "second"])
            .with_extents(PanelExtents {
                width: shoji_core::geometry::Extent::Cells(24),
                height: shoji_core::geometry::Extent::Cells(6),
                ..PanelExtents::auto()
            });
        panel.show().unwrap();
        assert!(probe.last_lines().iter().any(|l| l.contains("first")));

        panel.set_rows(vec!["tiny"]);
        panel.refresh().unwrap();
        let lines = probe.last_lines();
        assert!(lines.iter().any(|l| l.contains("tiny")));
        assert!(!lines.iter().any(|l| l.contains("first")));
        assert!(!lines.iter().any(|l| l.contains("second")));
    }

    #[test]
    fn rule_row_paints_a_horizontal_rule() {
        let (screen, probe) = screen(30, 10);
        let mut panel = Panel::new(
            &screen,
            vec![Row::from("above"), Row::horizontal_line(), Row::from("below")],
        );
        panel.show().unwrap();
        let rect = panel.rect();
        let rule_line = &probe.last_lines()[rect.y as usize + 2];
        assert!(rule_line.contains("──"));
    }

    #[test]
    fn grid_mode_highlights_only_the_selected_cell() {
        let (screen, probe) = screen(30, 8);
        let mut panel = Panel::new(&screen, vec![Row::from(vec!["aa", "bb"])])
            .with_grid_cells(true)
            .with_inner_padding(1);
        panel.set_selection(Some(0), 1, 0);
        panel.show().unwrap();

        let frame = probe.last_frame().unwrap();
        let rect = panel.rect();
        // First column (width 2 + padding) is normal, second inverted.
        assert_eq!(
            frame.get(rect.x + 2, rect.y + 1).unwrap().color,
            ColorPair::WhiteBlack
        );
        assert_eq!(
            frame.get(rect.x + 5, rect.y + 1).unwrap().color,
            ColorPair::HILIGHT
        );
    }

    #[test]
    fn long_row_is_clipped_not_wrapped() {
        let (screen, probe) = screen(16, 6);
        let mut panel = Panel::new(
            &screen,
            vec![Row::from(vec![Column::new("abcdefghijklmnop"), Column::new("XYZ")])],
        )
        .with_hilighted_row(None);
        panel.show().unwrap();
        let lines = probe.last_lines();
        // The second column never appears; the first is truncated.
        assert!(!lines.iter().any(|l| l.contains("XYZ")));
        assert!(lines.iter().any(|l| l.contains("abcdefghij")));
    }

    #[test]
    fn drop_removes_the_surface() {
        let (screen, probe) = screen(20, 8);
        {
            let mut panel = Panel::new(&screen, vec!["temporary"]);
            panel.show().unwrap();
            assert!(probe.last_lines().iter().any(|l| l.contains("temporary")));
        }
        screen.flush().unwrap();
        assert!(!probe.last_lines().iter().any(|l| l.contains("temporary")));
    }
}
