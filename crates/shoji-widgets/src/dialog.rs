#![forbid(unsafe_code)]

//! Modal prompt with a row of selectable buttons.

use unicode_segmentation::UnicodeSegmentation;

use shoji_core::error::Error;
use shoji_core::geometry::Rect;
use shoji_core::keys::Key;
use shoji_core::style::ColorPair;
use shoji_render::compositor::SurfaceId;
use shoji_render::screen::Screen;

use crate::row::{Row, clamp_width};

/// A small modal: one or more prompt rows above a right-aligned row of
/// buttons. Auto-sizes to the wider of the button row and the widest
/// prompt row.
pub struct DialogBox {
    screen: Screen,
    surface: SurfaceId,
    prompt_rows: Vec<Row>,
    button_labels: Vec<String>,
    decorated: Vec<String>,
    button_width: u16,
    content_width: u16,
    hilighted_button: usize,
    needs_render: bool,
}

impl DialogBox {
    /// Create a hidden dialog. `buttons` defaults to a single "OK" when
    /// empty.
    #[must_use]
    pub fn new<I, R>(screen: &Screen, prompt: I, buttons: &[&str]) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        let prompt_rows: Vec<Row> = prompt.into_iter().map(Into::into).collect();
        let button_labels: Vec<String> = if buttons.is_empty() {
            vec!["OK".to_owned()]
        } else {
            buttons.iter().map(|b| (*b).to_owned()).collect()
        };
        let decorated: Vec<String> = button_labels.iter().map(|b| format!(" [ {b} ] ")).collect();
        let button_width = clamp_width(decorated.iter().map(|b| b.chars().count()).sum());

        let mut content_width = button_width;
        for row in &prompt_rows {
            let row_width: u16 = row
                .columns()
                .iter()
                .fold(0, |acc, c| acc.saturating_add(c.width()));
            content_width = content_width.max(row_width);
        }

        let (screen_width, screen_height) = screen.size();
        let num_prompt_rows = clamp_width(prompt_rows.len());
        let width = content_width.saturating_add(4).min(screen_width);
        let height = num_prompt_rows.saturating_add(4).min(screen_height);
        let rect = Rect::new(
            screen_width.saturating_sub(content_width) / 2,
            screen_height.saturating_sub(2) / 2,
            width,
            height,
        );
        let surface = screen.create_surface(rect);

        Self {
            screen: screen.clone(),
            surface,
            prompt_rows,
            button_labels,
            decorated,
            button_width,
            content_width,
            hilighted_button: 0,
            needs_render: true,
        }
    }

    /// Replace the prompt rows, repainting immediately if requested.
    ///
    /// The window keeps its original size; longer prompt rows are
    /// truncated with an ellipsis when painted.
    pub fn set_prompt<I, R>(&mut self, prompt: I, refresh: bool) -> Result<(), Error>
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        self.prompt_rows = prompt.into_iter().map(Into::into).collect();
        self.needs_render = true;
        if refresh {
            self.render(false);
            self.screen.flush()?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn hilighted_button(&self) -> usize {
        self.hilighted_button
    }

    fn render(&mut self, force: bool) -> bool {
        if !(force || self.needs_render) {
            return false;
        }
        let prompt_rows = &self.prompt_rows;
        let decorated = &self.decorated;
        let content_width = self.content_width;
        let button_width = self.button_width;
        let hilighted = self.hilighted_button;
        let button_y = clamp_width(prompt_rows.len()).saturating_add(2);

        self.screen.paint(self.surface, |buf| {
            buf.erase();
            buf.draw_border(ColorPair::WhiteBlack);

            for (ri, row) in prompt_rows.iter().enumerate() {
                let y = clamp_width(ri).saturating_add(1);
                let mut x = 2;
                for column in row.columns() {
                    let text = ellipsize(column.text(), content_width);
                    x = buf.print_clipped(x, y, &text, column.color(), buf.width());
                }
            }

            // Buttons sit on their own line, right-aligned to the
            // content box.
            let mut x = 2u16.saturating_add(content_width.saturating_sub(button_width));
            for (bi, label) in decorated.iter().enumerate() {
                let color = if bi == hilighted {
                    ColorPair::HILIGHT
                } else {
                    ColorPair::WhiteBlack
                };
                x = buf.print_clipped(x, button_y, label, color, buf.width());
            }
        });
        self.needs_render = false;
        true
    }

    pub fn show(&mut self) -> Result<(), Error> {
        self.render(true);
        self.screen.show_surface(self.surface)
    }

    pub fn hide(&mut self) -> Result<(), Error> {
        self.screen.hide_surface(self.surface)
    }

    /// Show and block until a button is committed.
    ///
    /// Returns the confirmed button's label, or `None` on cancel.
    pub fn run(&mut self) -> Result<Option<String>, Error> {
        self.run_inner(false)
    }

    /// Show and return on the very first key: the confirmed label if
    /// that key was confirm, otherwise `None`.
    pub fn run_single_key(&mut self) -> Result<Option<String>, Error> {
        self.run_inner(true)
    }

    fn run_inner(&mut self, single_key: bool) -> Result<Option<String>, Error> {
        self.show()?;
        loop {
            let mut result = None;
            let mut committed = false;
            match self.screen.read_key()? {
                Key::Left => {
                    if self.hilighted_button > 0 {
                        self.hilighted_button -= 1;
                        self.needs_render = true;
                    }
                }
                Key::Right => {
                    if self.hilighted_button + 1 < self.button_labels.len() {
                        self.hilighted_button += 1;
                        self.needs_render = true;
                    }
                }
                Key::Escape => {
                    committed = true;
                }
                Key::Enter => {
                    result = Some(self.button_labels[self.hilighted_button].clone());
                    committed = true;
                }
                _ => {}
            }
            if self.render(false) {
                self.screen.flush()?;
            }
            if single_key || committed {
                self.hide()?;
                return Ok(result);
            }
        }
    }
}

impl Drop for DialogBox {
    fn drop(&mut self) {
        self.screen.remove_surface(self.surface);
    }
}

/// Truncate to `max_width` display cells with a trailing ellipsis,
/// cutting on grapheme boundaries.
fn ellipsize(text: &str, max_width: u16) -> String {
    let max_width = usize::from(max_width);
    if text.chars().count() <= max_width {
        return text.to_owned();
    }
    let keep = max_width.saturating_sub(3);
    let mut out: String = text.graphemes(true).take(keep).collect();
    out.push_str("...");
    out
}
