#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII management of raw mode, the alternate screen, and cursor
//! visibility. The guard restores everything in reverse order on drop,
//! which also runs during panic unwinding, so no exit path leaves the
//! operator with a broken terminal.
//!
//! Only one session may be active per process; a second [`TerminalSession::new`]
//! fails with [`Error::SessionActive`].

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{cursor, execute, terminal};
use tracing::debug;

use crate::error::Error;

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// What the session should switch on when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Enter the alternate screen (and clear it).
    pub alternate_screen: bool,
    /// Hide the hardware cursor; widgets paint their own.
    pub hide_cursor: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            hide_cursor: true,
        }
    }
}

/// An active raw-mode terminal session.
///
/// Dropping the session restores cursor visibility, leaves the alternate
/// screen, and exits raw mode, in that order.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
}

impl TerminalSession {
    /// Enter raw mode and apply the requested options.
    pub fn new(options: SessionOptions) -> Result<Self, Error> {
        if SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::SessionActive);
        }

        let session = Self { options };
        if let Err(err) = session.enter() {
            SESSION_ACTIVE.store(false, Ordering::SeqCst);
            return Err(err.into());
        }
        debug!(?options, "terminal session started");
        Ok(session)
    }

    fn enter(&self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if self.options.alternate_screen {
            execute!(
                stdout,
                terminal::EnterAlternateScreen,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
        }
        if self.options.hide_cursor {
            execute!(stdout, cursor::Hide)?;
        }
        stdout.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Restore in reverse order of entry; failures here are logged and
        // otherwise ignored so drop never panics.
        let mut stdout = io::stdout();
        if self.options.hide_cursor {
            let _ = execute!(stdout, cursor::Show);
        }
        if self.options.alternate_screen {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            debug!(%err, "failed to leave raw mode");
        }
        let _ = stdout.flush();
        SESSION_ACTIVE.store(false, Ordering::SeqCst);
        debug!("terminal session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_alt_screen_and_hide_cursor() {
        let options = SessionOptions::default();
        assert!(options.alternate_screen);
        assert!(options.hide_cursor);
    }
}
