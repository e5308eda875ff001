#![forbid(unsafe_code)]

//! Single-line text input with cursor and horizontal scroll.

use shoji_core::error::Error;
use shoji_core::geometry::Rect;
use shoji_core::keys::Key;
use shoji_core::style::ColorPair;
use shoji_render::compositor::SurfaceId;
use shoji_render::screen::Screen;

use crate::row::clamp_width;

const DEFAULT_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 \
                               !@#$%^&*(),<.>/?;:'\"[{]}-_=+";

/// A one-line editor: fixed-width entry field, prompt, insert cursor,
/// and a visible slice that scrolls horizontally with the cursor.
///
/// Invariant: the visible slice starts at `first_visible`, is at most
/// `entry_width` characters long, and always contains the cursor.
pub struct InputPanel {
    screen: Screen,
    surface: SurfaceId,
    prompt: String,
    prompt_width: u16,
    chars: Vec<char>,
    cursor: usize,
    first_visible: usize,
    entry_width: usize,
    allowed: String,
    needs_render: bool,
}

impl InputPanel {
    /// Create a hidden, centered input panel.
    ///
    /// `entry_width` defaults to a quarter of the screen width. The
    /// cursor starts at the end of `default_value`.
    #[must_use]
    pub fn new(screen: &Screen, prompt: impl Into<String>, default_value: impl Into<String>) -> Self {
        let (screen_width, screen_height) = screen.size();
        Self::with_entry_width(
            screen,
            prompt,
            default_value,
            usize::from(screen_width / 4),
            screen_width,
            screen_height,
        )
    }

    /// Explicit entry width in characters.
    #[must_use]
    pub fn sized(
        screen: &Screen,
        prompt: impl Into<String>,
        default_value: impl Into<String>,
        entry_width: usize,
    ) -> Self {
        let (screen_width, screen_height) = screen.size();
        Self::with_entry_width(screen, prompt, default_value, entry_width, screen_width, screen_height)
    }

    fn with_entry_width(
        screen: &Screen,
        prompt: impl Into<String>,
        default_value: impl Into<String>,
        entry_width: usize,
        screen_width: u16,
        screen_height: u16,
    ) -> Self {
        let prompt = prompt.into();
        let prompt_width = clamp_width(prompt.chars().count());
        let chars: Vec<char> = default_value.into().chars().collect();
        let cursor = chars.len();

        let content_width = clamp_width(entry_width).saturating_add(prompt_width);
        let rect = Rect::new(
            (screen_width.saturating_sub(content_width)) / 2,
            screen_height.saturating_sub(2) / 2,
            content_width.saturating_add(4).min(screen_width),
            3,
        );
        let surface = screen.create_surface(rect);

        let mut panel = Self {
            screen: screen.clone(),
            surface,
            prompt,
            prompt_width,
            chars,
            cursor,
            first_visible: 0,
            entry_width: entry_width.max(1),
            allowed: DEFAULT_ALLOWED.to_owned(),
            needs_render: true,
        };
        // Same window math as End: show the tail when the default value
        // is longer than the entry field.
        panel.first_visible = if panel.cursor < panel.entry_width {
            0
        } else {
            panel.cursor - panel.entry_width
        };
        panel
    }

    /// Restrict which characters may be typed into the field.
    #[must_use]
    pub fn with_allowed_chars(mut self, allowed: impl Into<String>) -> Self {
        self.allowed = allowed.into();
        self
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn first_visible(&self) -> usize {
        self.first_visible
    }

    fn render(&mut self, force: bool) -> bool {
        if !(force || self.needs_render) {
            return false;
        }
        let prompt = &self.prompt;
        let prompt_width = self.prompt_width;
        let visible: String = self
            .chars
            .iter()
            .skip(self.first_visible)
            .take(self.entry_width)
            .collect();
        let cursor_char = self.chars.get(self.cursor).copied().unwrap_or(' ');
        let cursor_x = clamp_width(self.cursor - self.first_visible);

        self.screen.paint(self.surface, |buf| {
            buf.erase();
            buf.draw_border(ColorPair::WhiteBlack);
            let entry_x = buf.print_clipped(2, 1, prompt, ColorPair::CyanBlack, buf.width());
            buf.print_clipped(entry_x, 1, &visible, ColorPair::WhiteBlack, buf.width());
            buf.set(
                2 + prompt_width + cursor_x,
                1,
                shoji_render::cell::Cell::new(cursor_char, ColorPair::BlackWhite),
            );
        });
        self.needs_render = false;
        true
    }

    /// Apply one editing keystroke.
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                    if self.cursor < self.first_visible {
                        self.first_visible = self.cursor;
                    }
                    self.needs_render = true;
                }
            }
            Key::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                    self.needs_render = true;
                }
            }
            Key::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    if self.cursor < self.first_visible {
                        self.first_visible = self.cursor;
                    }
                    self.needs_render = true;
                }
            }
            Key::Right => {
                if self.cursor < self.chars.len() {
                    self.cursor += 1;
                    if self.cursor - self.first_visible >= self.entry_width {
                        self.first_visible += 1;
                    }
                    self.needs_render = true;
                }
            }
            Key::Home => {
                self.cursor = 0;
                self.first_visible = 0;
                self.needs_render = true;
            }
            Key::End => {
                self.cursor = self.chars.len();
                self.first_visible = if self.cursor < self.entry_width {
                    0
                } else {
                    self.cursor - self.entry_width
                };
                self.needs_render = true;
            }
            Key::Char(c) => {
                if self.allowed.contains(c) {
                    self.chars.insert(self.cursor, c);
                    self.cursor += 1;
                    if self.cursor - self.first_visible >= self.entry_width {
                        self.first_visible += 1;
                    }
                    self.needs_render = true;
                }
            }
            _ => {}
        }
    }

    pub fn show(&mut self) -> Result<(), Error> {
        self.render(true);
        self.screen.show_surface(self.surface)
    }

    pub fn hide(&mut self) -> Result<(), Error> {
        self.screen.hide_surface(self.surface)
    }

    /// Show and block until committed.
    ///
    /// Returns the edited text on confirm, `None` on cancel. The panel
    /// is hidden before returning.
    pub fn run(&mut self) -> Result<Option<String>, Error> {
        self.show()?;
        let result = loop {
            if self.render(false) {
                self.screen.flush()?;
            }
            match self.screen.read_key()? {
                Key::Escape => break None,
                Key::Enter => break Some(self.text()),
                key => self.handle_key(key),
            }
        };
        self.hide()?;
        Ok(result)
    }
}

impl Drop for InputPanel {
    fn drop(&mut self) {
        self.screen.remove_surface(self.surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoji_render::backend::{TestBackend, TestProbe};

    fn editor(entry_width: usize, default_value: &str) -> (InputPanel, TestProbe) {
        let (backend, probe) = TestBackend::new(80, 24);
        let screen = Screen::new(Box::new(backend)).unwrap();
        (
            InputPanel::sized(&screen, "Title: ", default_value, entry_width),
            probe,
        )
    }

    #[test]
    fn cursor_starts_at_end_of_default() {
        let (editor, _probe) = editor(10, "hello");
        assert_eq!(editor.cursor(), 5);
        assert_eq!(editor.first_visible(), 0);
    }

    #[test]
    fn typing_scrolls_the_window_with_the_cursor() {
        // Entry width 10, default "hello": End leaves the window at 0,
        // then eight inserts push the window start to 4.
        let (mut editor, _probe) = editor(10, "hello");
        editor.handle_key(Key::End);
        assert_eq!(editor.cursor(), 5);
        assert_eq!(editor.first_visible(), 0);

        for c in "12345678".chars() {
            editor.handle_key(Key::Char(c));
        }
        assert_eq!(editor.text(), "hello12345678");
        assert_eq!(editor.cursor(), 13);
        assert_eq!(editor.first_visible(), 4);
    }

    #[test]
    fn window_always_contains_the_cursor() {
        let (mut editor, _probe) = editor(6, "a somewhat long value");
        let keys = [
            Key::Home,
            Key::Right,
            Key::End,
            Key::Left,
            Key::Left,
            Key::Char('x'),
            Key::Backspace,
        ];
        for key in keys {
            editor.handle_key(key);
            let cursor = editor.cursor();
            let first = editor.first_visible();
            assert!(cursor >= first, "cursor {cursor} left of window {first}");
            assert!(
                cursor - first <= 6,
                "cursor {cursor} outside 6-wide window at {first}"
            );
        }
    }

    #[test]
    fn backspace_and_delete_edit_at_cursor() {
        let (mut editor, _probe) = editor(20, "abcdef");
        editor.handle_key(Key::Home);
        editor.handle_key(Key::Delete);
        assert_eq!(editor.text(), "bcdef");

        editor.handle_key(Key::End);
        editor.handle_key(Key::Backspace);
        assert_eq!(editor.text(), "bcde");

        // Backspace at the start is a no-op.
        editor.handle_key(Key::Home);
        editor.handle_key(Key::Backspace);
        assert_eq!(editor.text(), "bcde");
    }

    #[test]
    fn insert_in_the_middle() {
        let (mut editor, _probe) = editor(20, "herld");
        editor.handle_key(Key::Home);
        editor.handle_key(Key::Right);
        editor.handle_key(Key::Right);
        for c in "llo wo".chars() {
            editor.handle_key(Key::Char(c));
        }
        assert_eq!(editor.text(), "hello world");
    }

    #[test]
    fn disallowed_characters_are_dropped() {
        let (mut editor, _probe) = editor(20, "");
        editor.handle_key(Key::Char('a'));
        editor.handle_key(Key::Char('\u{7f}'));
        editor.handle_key(Key::Char('é'));
        editor.handle_key(Key::Char('b'));
        assert_eq!(editor.text(), "ab");
    }

    #[test]
    fn run_commits_or_cancels() {
        let (mut editor, probe) = editor(20, "draft");
        probe.push_keys(&[Key::Char('s'), Key::Enter]);
        assert_eq!(editor.run().unwrap(), Some("drafts".to_owned()));

        probe.push_keys(&[Key::Char('z'), Key::Escape]);
        assert_eq!(editor.run().unwrap(), None);
    }

    #[test]
    fn renders_prompt_value_and_cursor_cell() {
        let (mut editor, probe) = editor(10, "hello");
        editor.show().unwrap();
        let lines = probe.last_lines();
        assert!(lines.iter().any(|l| l.contains("Title: hello")));

        let frame = probe.last_frame().unwrap();
        // Cursor cell sits one past the text, inverted.
        let mut found = false;
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.get(x, y).unwrap().color == ColorPair::BlackWhite {
                    found = true;
                }
            }
        }
        assert!(found, "no cursor cell painted");
    }
}
