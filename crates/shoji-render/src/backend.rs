#![forbid(unsafe_code)]

//! Terminal backends.
//!
//! A [`Backend`] turns composed frames into terminal output and turns
//! terminal input into [`Key`]s. [`CrosstermBackend`] is the real one;
//! [`TestBackend`] is an in-memory stand-in with scripted input for
//! tests.

use std::io::{self, Write};
#[cfg(unix)]
use std::os::fd::BorrowedFd;

use crossterm::{cursor, queue, style, terminal};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use shoji_core::error::Error;
use shoji_core::keys::{Key, key_from_crossterm};
use shoji_core::style::ColorPair;

/// Which side of the event loop woke up first.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// A key is available on the terminal.
    Input,
    /// The watched task fd became readable.
    Task,
}

/// Presentation and input for one terminal.
pub trait Backend {
    /// Current terminal size as `(width, height)`.
    fn size(&self) -> Result<(u16, u16), Error>;

    /// Push a composed frame to the terminal.
    fn present(&mut self, frame: &Buffer) -> Result<(), Error>;

    /// Block until a key arrives.
    fn read_key(&mut self) -> Result<Key, Error>;

    /// Block until either terminal input or `task_fd` is readable.
    ///
    /// When both are ready at once the task wins, so a finished task is
    /// reported as completed even if a cancel key is already queued.
    #[cfg(unix)]
    fn wait_ready(&mut self, task_fd: BorrowedFd<'_>) -> Result<Readiness, Error>;
}

/// Real backend writing to stdout through crossterm.
///
/// Frames are diffed against the previously presented one and only
/// changed runs are emitted. The first frame after startup or a resize
/// is a full repaint.
pub struct CrosstermBackend {
    stdout: io::Stdout,
    prev: Option<Buffer>,
    #[cfg(unix)]
    tty: Option<std::fs::File>,
}

impl CrosstermBackend {
    #[must_use]
    pub fn new() -> Self {
        #[cfg(unix)]
        let tty = match std::fs::File::open("/dev/tty") {
            Ok(f) => Some(f),
            Err(err) => {
                debug!(%err, "no /dev/tty, multiplexing on stdin");
                None
            }
        };
        Self {
            stdout: io::stdout(),
            prev: None,
            #[cfg(unix)]
            tty,
        }
    }

    fn emit_row(&mut self, frame: &Buffer, y: u16, prev: Option<&Buffer>) -> io::Result<()> {
        let mut x = 0;
        while x < frame.width() {
            let cell = match frame.get(x, y) {
                Some(c) => *c,
                None => break,
            };
            let unchanged = prev.is_some_and(|p| p.get(x, y) == Some(&cell));
            if unchanged {
                x += 1;
                continue;
            }
            // Extend the run while cells keep changing with one color.
            // Wide heads advance by their display width, skipping the
            // blank continuation cells.
            let start = x;
            let color = cell.color;
            let mut text = String::new();
            while x < frame.width() {
                let Some(c) = frame.get(x, y) else { break };
                if c.color != color || prev.is_some_and(|p| p.get(x, y) == Some(c)) {
                    break;
                }
                text.push(c.ch);
                x += UnicodeWidthChar::width(c.ch).map_or(1, |w| w.max(1)) as u16;
            }
            queue!(
                self.stdout,
                cursor::MoveTo(start, y),
                style::SetColors(color.colors()),
                style::Print(text),
            )?;
        }
        Ok(())
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for CrosstermBackend {
    fn size(&self) -> Result<(u16, u16), Error> {
        Ok(terminal::size()?)
    }

    fn present(&mut self, frame: &Buffer) -> Result<(), Error> {
        let stale = self
            .prev
            .as_ref()
            .is_none_or(|p| p.width() != frame.width() || p.height() != frame.height());
        if stale {
            queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        }
        let prev = if stale { None } else { self.prev.take() };
        for y in 0..frame.height() {
            self.emit_row(frame, y, prev.as_ref())?;
        }
        queue!(
            self.stdout,
            style::SetColors(ColorPair::WhiteBlack.colors())
        )?;
        self.stdout.flush()?;
        self.prev = Some(frame.clone());
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key, Error> {
        loop {
            let event = crossterm::event::read()?;
            if let Some(key) = key_from_crossterm(&event) {
                return Ok(key);
            }
        }
    }

    #[cfg(unix)]
    fn wait_ready(&mut self, task_fd: BorrowedFd<'_>) -> Result<Readiness, Error> {
        use std::os::fd::AsFd;

        use nix::poll::{PollFd, PollFlags, PollTimeout, poll};

        // crossterm may have already parsed and buffered an event, in
        // which case the input fd will not signal again.
        if crossterm::event::poll(std::time::Duration::ZERO)? {
            return Ok(Readiness::Input);
        }
        let stdin = io::stdin();
        let input_fd = match &self.tty {
            Some(tty) => tty.as_fd(),
            None => stdin.as_fd(),
        };
        loop {
            let mut fds = [
                PollFd::new(task_fd, PollFlags::POLLIN),
                PollFd::new(input_fd, PollFlags::POLLIN),
            ];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                Err(nix::errno::Errno::EINTR) => continue,
                Err(err) => return Err(Error::Io(io::Error::from(err))),
            }
            let readable = |fd: &PollFd<'_>| {
                fd.revents().is_some_and(|r| {
                    r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
                })
            };
            // Task first: completion beats a queued cancel key.
            if readable(&fds[0]) {
                return Ok(Readiness::Task);
            }
            if readable(&fds[1]) {
                return Ok(Readiness::Input);
            }
        }
    }
}

/// In-memory backend with scripted input and captured frames.
///
/// [`TestBackend::new`] hands back the backend plus a [`TestProbe`] that
/// stays usable after the backend has been boxed into a screen.
#[cfg(any(test, feature = "test-helpers"))]
pub use self::test_backend::{TestBackend, TestProbe};

#[cfg(any(test, feature = "test-helpers"))]
mod test_backend {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::{Backend, Buffer, Error, Key};
    #[cfg(unix)]
    use super::{BorrowedFd, Readiness};

    struct State {
        size: (u16, u16),
        keys: VecDeque<Key>,
        #[cfg(unix)]
        ready: VecDeque<Readiness>,
        frames: Vec<Buffer>,
    }

    /// Scripted in-memory backend.
    pub struct TestBackend {
        state: Rc<RefCell<State>>,
    }

    /// Shared view into a [`TestBackend`] for scripting and assertions.
    #[derive(Clone)]
    pub struct TestProbe {
        state: Rc<RefCell<State>>,
    }

    impl TestBackend {
        #[must_use]
        pub fn new(width: u16, height: u16) -> (Self, TestProbe) {
            let state = Rc::new(RefCell::new(State {
                size: (width, height),
                keys: VecDeque::new(),
                #[cfg(unix)]
                ready: VecDeque::new(),
                frames: Vec::new(),
            }));
            (
                Self {
                    state: Rc::clone(&state),
                },
                TestProbe { state },
            )
        }
    }

    impl TestProbe {
        /// Queue keys for `read_key` to hand out in order.
        pub fn push_keys(&self, keys: &[Key]) {
            self.state.borrow_mut().keys.extend(keys.iter().copied());
        }

        /// Script the next `wait_ready` results.
        #[cfg(unix)]
        pub fn push_ready(&self, ready: &[Readiness]) {
            self.state.borrow_mut().ready.extend(ready.iter().copied());
        }

        /// Number of frames presented so far.
        #[must_use]
        pub fn present_count(&self) -> usize {
            self.state.borrow().frames.len()
        }

        /// The most recently presented frame.
        #[must_use]
        pub fn last_frame(&self) -> Option<Buffer> {
            self.state.borrow().frames.last().cloned()
        }

        /// The most recently presented frame as plain text rows.
        #[must_use]
        pub fn last_lines(&self) -> Vec<String> {
            self.last_frame().map(|f| f.to_lines()).unwrap_or_default()
        }
    }

    impl Backend for TestBackend {
        fn size(&self) -> Result<(u16, u16), Error> {
            Ok(self.state.borrow().size)
        }

        fn present(&mut self, frame: &Buffer) -> Result<(), Error> {
            self.state.borrow_mut().frames.push(frame.clone());
            Ok(())
        }

        fn read_key(&mut self) -> Result<Key, Error> {
            self.state
                .borrow_mut()
                .keys
                .pop_front()
                .ok_or(Error::InputExhausted)
        }

        #[cfg(unix)]
        fn wait_ready(&mut self, _task_fd: BorrowedFd<'_>) -> Result<Readiness, Error> {
            let mut state = self.state.borrow_mut();
            if let Some(ready) = state.ready.pop_front() {
                return Ok(ready);
            }
            // Unscripted default: drain input first, then the task.
            if state.keys.is_empty() {
                Ok(Readiness::Task)
            } else {
                Ok(Readiness::Input)
            }
        }
    }
}
