#![forbid(unsafe_code)]

//! Acknowledgement panel for multi-line messages and logs.

use shoji_core::error::Error;
use shoji_core::geometry::PanelExtents;
use shoji_core::keys::Key;

use crate::panel::Panel;
use crate::row::Row;

/// A panel that shows message lines (no highlight) and blocks until the
/// operator acknowledges with confirm or cancel.
///
/// Lines can be appended while visible, which makes it usable as a live
/// progress log during long operations.
pub struct MessagePanel {
    panel: Panel,
    lines: Vec<Row>,
}

impl MessagePanel {
    #[must_use]
    pub fn new<I, R>(screen: &shoji_render::screen::Screen, lines: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        let lines: Vec<Row> = lines.into_iter().map(Into::into).collect();
        let panel = Panel::new(screen, lines.clone()).with_hilighted_row(None);
        Self { panel, lines }
    }

    #[must_use]
    pub fn with_extents(mut self, extents: PanelExtents) -> Self {
        self.panel = self.panel.with_extents(extents);
        self
    }

    /// Append lines and repaint immediately if visible.
    ///
    /// With `trim_to_window`, older lines are discarded so the newest
    /// ones stay inside the content rectangle (a rolling log).
    pub fn append_lines<I, R>(&mut self, lines: I, trim_to_window: bool) -> Result<(), Error>
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        if trim_to_window {
            let window = self.panel.content_height() as usize;
            if self.lines.len() > window {
                self.lines.drain(..self.lines.len() - window);
            }
        }
        self.panel.set_rows(self.lines.clone());
        self.panel.set_hilighted_row(None, None);
        if self.panel.is_visible() {
            self.panel.refresh()?;
        }
        Ok(())
    }

    /// Replace all lines and force a repaint.
    pub fn set_lines<I, R>(&mut self, lines: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self.panel.set_rows(self.lines.clone());
        self.panel.set_hilighted_row(None, None);
        if self.panel.is_visible() {
            self.panel.refresh()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Show and block until acknowledged.
    ///
    /// Returns `true` on confirm, `false` on cancel; every other key is
    /// ignored. The panel is hidden before returning.
    pub fn run(&mut self) -> Result<bool, Error> {
        self.panel.show()?;
        loop {
            match self.panel.screen().read_key()? {
                Key::Enter => {
                    self.panel.hide()?;
                    return Ok(true);
                }
                Key::Escape => {
                    self.panel.hide()?;
                    return Ok(false);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoji_core::style::ColorPair;
    use shoji_render::backend::{TestBackend, TestProbe};
    use shoji_render::screen::Screen;

    fn screen(width: u16, height: u16) -> (Screen, TestProbe) {
        let (backend, probe) = TestBackend::new(width, height);
        (Screen::new(Box::new(backend)).unwrap(), probe)
    }

    #[test]
    fn no_line_is_highlighted() {
        let (screen, probe) = screen(40, 12);
        let mut panel = MessagePanel::new(&screen, vec!["first", "second"]);
        panel.panel.show().unwrap();

        let frame = probe.last_frame().unwrap();
        let rect = panel.panel().rect();
        for dy in 1..rect.height - 1 {
            for dx in 1..rect.width - 1 {
                let cell = frame.get(rect.x + dx, rect.y + dy).unwrap();
                assert_ne!(cell.color, ColorPair::HILIGHT);
            }
        }
    }

    #[test]
    fn run_distinguishes_confirm_from_cancel() {
        let (screen, probe) = screen(40, 12);
        let mut panel = MessagePanel::new(&screen, vec!["done"]);

        probe.push_keys(&[Key::Char('x'), Key::Enter]);
        assert!(panel.run().unwrap());

        probe.push_keys(&[Key::Escape]);
        assert!(!panel.run().unwrap());
    }

    #[test]
    fn styled_banner_lines_keep_their_color() {
        let (screen, probe) = screen(50, 12);
        let mut panel = MessagePanel::new(
            &screen,
            vec![
                Row::from(("Exception occurred:", ColorPair::BlackRed)),
                Row::from(""),
                Row::from("details"),
            ],
        );
        panel.panel.show().unwrap();

        let frame = probe.last_frame().unwrap();
        let rect = panel.panel().rect();
        let banner = frame.get(rect.x + 2, rect.y + 1).unwrap();
        assert_eq!(banner.color, ColorPair::BlackRed);
    }

    #[test]
    fn append_repaints_while_visible() {
        let (screen, probe) = screen(40, 14);
        let mut panel = MessagePanel::new(&screen, vec!["step 1"]);
        panel.panel.show().unwrap();
        let before = probe.present_count();

        panel.append_lines(vec!["step 2"], false).unwrap();
        assert!(probe.present_count() > before);
        assert!(probe.last_lines().iter().any(|l| l.contains("step 2")));
    }

    #[test]
    fn trim_keeps_only_the_newest_window() {
        let (screen, _probe) = screen(40, 20);
        // Fixed height: content window of 3 lines.
        let mut panel = MessagePanel::new(&screen, vec!["a", "b", "c"]).with_extents(
            PanelExtents {
                height: shoji_core::geometry::Extent::Cells(5),
                ..PanelExtents::auto()
            },
        );
        panel.append_lines(vec!["d", "e"], true).unwrap();

        let texts: Vec<&str> = panel
            .panel()
            .rows()
            .iter()
            .map(|r| r.columns()[0].text())
            .collect();
        assert_eq!(texts, vec!["c", "d", "e"]);
    }
}
