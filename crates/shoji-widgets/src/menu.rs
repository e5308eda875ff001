#![forbid(unsafe_code)]

//! Root menu and dispatch loop.
//!
//! The menu owns the terminal for the session: it renders labeled
//! actions as a scrolling list, dispatches the selected callback on
//! confirm, and catches every callback failure at this boundary so no
//! single action can take down the interactive session.

use std::error::Error as StdError;

use tracing::error;

use shoji_core::error::Error;
use shoji_core::keys::Key;
use shoji_core::style::ColorPair;
use shoji_render::screen::Screen;

use crate::message::MessagePanel;
use crate::row::Row;
use crate::scrolling::ScrollingPanel;

/// A menu callback. Failures are caught and displayed at the dispatch
/// boundary; panics are treated as defects and propagate.
pub type MenuAction = Box<dyn FnMut() -> Result<(), Box<dyn StdError>>>;

/// One labeled menu entry, or a separator.
pub struct MenuItem {
    label: Row,
    action: Option<MenuAction>,
}

impl MenuItem {
    /// A selectable entry dispatching to `action`.
    #[must_use]
    pub fn new(
        label: impl Into<Row>,
        action: impl FnMut() -> Result<(), Box<dyn StdError>> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            action: Some(Box::new(action)),
        }
    }

    /// A non-dispatching separator rule.
    #[must_use]
    pub fn separator() -> Self {
        Self {
            label: Row::horizontal_line(),
            action: None,
        }
    }

    /// A label with nothing behind it (e.g. a heading).
    #[must_use]
    pub fn label_only(label: impl Into<Row>) -> Self {
        Self {
            label: label.into(),
            action: None,
        }
    }
}

/// The root menu loop.
pub struct MainMenu {
    panel: ScrollingPanel,
    items: Vec<MenuItem>,
    quit_confirm: Box<dyn FnMut() -> bool>,
}

impl MainMenu {
    #[must_use]
    pub fn new(screen: &Screen, items: Vec<MenuItem>) -> Self {
        let labels: Vec<Row> = items.iter().map(|item| item.label.clone()).collect();
        Self {
            panel: ScrollingPanel::new(screen, labels),
            items,
            quit_confirm: Box::new(|| true),
        }
    }

    /// Hook asked before quitting on cancel; returning `false` keeps the
    /// menu running.
    #[must_use]
    pub fn with_quit_confirm(mut self, confirm: impl FnMut() -> bool + 'static) -> Self {
        self.quit_confirm = Box::new(confirm);
        self
    }

    #[must_use]
    pub fn panel(&self) -> &ScrollingPanel {
        &self.panel
    }

    /// Run until the operator quits.
    ///
    /// Confirm hides the menu, runs the selected item's callback, and
    /// shows the menu again. A callback error is logged, displayed in a
    /// message panel, and otherwise swallowed; the session continues.
    pub fn run_modally(&mut self) -> Result<(), Error> {
        self.panel.show()?;
        loop {
            self.panel.panel_mut().sync()?;
            let key = self.panel.panel().screen().read_key()?;
            match key {
                Key::Escape => {
                    if (self.quit_confirm)() {
                        self.panel.hide()?;
                        return Ok(());
                    }
                }
                Key::Enter => {
                    let index = self.panel.panel().hilighted_row().unwrap_or(0);
                    self.panel.hide()?;
                    if let Some(item) = self.items.get_mut(index)
                        && let Some(action) = item.action.as_mut()
                        && let Err(err) = action()
                    {
                        report_action_failure(self.panel.panel().screen(), err.as_ref())?;
                    }
                    self.panel.show()?;
                }
                key => self.panel.handle_key(key),
            }
        }
    }
}

/// Log a failed action and show its error chain in a modal until
/// acknowledged.
fn report_action_failure(screen: &Screen, err: &dyn StdError) -> Result<(), Error> {
    let lines = error_lines(err);
    for line in &lines {
        error!("menu action failed: {line}");
    }
    let mut rows = vec![
        Row::from(("Error:", ColorPair::BlackRed)),
        Row::from(""),
    ];
    rows.extend(lines.into_iter().map(Row::from));
    MessagePanel::new(screen, rows).run()?;
    Ok(())
}

/// Flatten an error and its source chain into display lines.
pub fn error_lines(err: &dyn StdError) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines
}
