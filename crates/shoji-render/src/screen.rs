#![forbid(unsafe_code)]

//! The shared screen handle widgets are constructed against.
//!
//! [`Screen`] owns the backend, the compositor, and one screen-sized
//! frame buffer. Handles are cheap clones of one shared inner, so every
//! panel on a screen talks to the same surface stack. Nothing reaches
//! the terminal except through a `Screen`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::Backend;
#[cfg(unix)]
use crate::backend::Readiness;
use crate::buffer::Buffer;
use crate::compositor::{Compositor, SurfaceId};
use shoji_core::error::Error;
use shoji_core::geometry::Rect;
use shoji_core::keys::Key;

struct ScreenInner {
    backend: Box<dyn Backend>,
    compositor: Compositor,
    frame: Buffer,
}

/// Handle to one terminal screen.
#[derive(Clone)]
pub struct Screen {
    inner: Rc<RefCell<ScreenInner>>,
}

impl Screen {
    /// Wrap a backend. The frame buffer is sized once from the backend.
    pub fn new(backend: Box<dyn Backend>) -> Result<Self, Error> {
        let (width, height) = backend.size()?;
        Ok(Self {
            inner: Rc::new(RefCell::new(ScreenInner {
                backend,
                compositor: Compositor::new(),
                frame: Buffer::new(width, height),
            })),
        })
    }

    /// Screen size as `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        let inner = self.inner.borrow();
        (inner.frame.width(), inner.frame.height())
    }

    /// Add a hidden surface on top of the stack.
    pub fn create_surface(&self, rect: Rect) -> SurfaceId {
        self.inner.borrow_mut().compositor.create(rect)
    }

    /// Drop a surface without repainting.
    pub fn remove_surface(&self, id: SurfaceId) {
        self.inner.borrow_mut().compositor.remove(id);
    }

    #[must_use]
    pub fn surface_rect(&self, id: SurfaceId) -> Option<Rect> {
        self.inner.borrow().compositor.rect(id)
    }

    /// Move and resize a surface; a size change blanks its buffer.
    pub fn set_surface_rect(&self, id: SurfaceId, rect: Rect) {
        self.inner.borrow_mut().compositor.set_rect(id, rect);
    }

    /// Paint into a surface's buffer. Unknown ids are ignored.
    pub fn paint(&self, id: SurfaceId, draw: impl FnOnce(&mut Buffer)) {
        let mut inner = self.inner.borrow_mut();
        if let Some(buffer) = inner.compositor.buffer_mut(id) {
            draw(buffer);
        }
    }

    /// Make a surface visible on top of the stack and repaint.
    pub fn show_surface(&self, id: SurfaceId) -> Result<(), Error> {
        self.inner.borrow_mut().compositor.show(id);
        self.flush()
    }

    /// Hide a surface and repaint what was underneath.
    pub fn hide_surface(&self, id: SurfaceId) -> Result<(), Error> {
        self.inner.borrow_mut().compositor.hide(id);
        self.flush()
    }

    #[must_use]
    pub fn is_surface_visible(&self, id: SurfaceId) -> bool {
        self.inner.borrow().compositor.is_visible(id)
    }

    /// Compose the surface stack and present the result.
    pub fn flush(&self) -> Result<(), Error> {
        let inner = &mut *self.inner.borrow_mut();
        inner.compositor.compose(&mut inner.frame);
        inner.backend.present(&inner.frame)
    }

    /// Block for the next key.
    pub fn read_key(&self) -> Result<Key, Error> {
        self.inner.borrow_mut().backend.read_key()
    }

    /// Block until terminal input or the given task fd is readable.
    #[cfg(unix)]
    pub fn wait_ready(&self, task_fd: std::os::fd::BorrowedFd<'_>) -> Result<Readiness, Error> {
        self.inner.borrow_mut().backend.wait_ready(task_fd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TestBackend;
    use shoji_core::style::ColorPair;

    fn screen(width: u16, height: u16) -> (Screen, crate::backend::TestProbe) {
        let (backend, probe) = TestBackend::new(width, height);
        let screen = Screen::new(Box::new(backend)).unwrap();
        (screen, probe)
    }

    #[test]
    fn size_comes_from_the_backend() {
        let (screen, _probe) = screen(40, 12);
        assert_eq!(screen.size(), (40, 12));
    }

    #[test]
    fn show_paints_and_presents() {
        let (screen, probe) = screen(6, 3);
        let id = screen.create_surface(Rect::new(1, 1, 4, 1));
        screen.paint(id, |buf| {
            buf.print_clipped(0, 0, "hiya", ColorPair::WhiteBlack, 4);
        });
        screen.show_surface(id).unwrap();

        assert_eq!(probe.present_count(), 1);
        assert_eq!(probe.last_lines(), vec!["      ", " hiya ", "      "]);
    }

    #[test]
    fn hide_restores_what_was_underneath() {
        let (screen, probe) = screen(4, 1);
        let below = screen.create_surface(Rect::new(0, 0, 4, 1));
        let above = screen.create_surface(Rect::new(0, 0, 4, 1));
        screen.paint(below, |buf| {
            buf.print_clipped(0, 0, "back", ColorPair::WhiteBlack, 4);
        });
        screen.paint(above, |buf| {
            buf.print_clipped(0, 0, "OVER", ColorPair::WhiteBlack, 4);
        });
        screen.show_surface(below).unwrap();
        screen.show_surface(above).unwrap();
        assert_eq!(probe.last_lines(), vec!["OVER"]);

        screen.hide_surface(above).unwrap();
        assert_eq!(probe.last_lines(), vec!["back"]);
        assert_eq!(probe.present_count(), 3);
    }

    #[test]
    fn paint_on_removed_surface_is_ignored() {
        let (screen, probe) = screen(3, 1);
        let id = screen.create_surface(Rect::new(0, 0, 3, 1));
        screen.remove_surface(id);
        screen.paint(id, |buf| {
            buf.print_clipped(0, 0, "no", ColorPair::WhiteBlack, 3);
        });
        screen.flush().unwrap();
        assert_eq!(probe.last_lines(), vec!["   "]);
    }

    #[test]
    fn clones_share_one_surface_stack() {
        let (screen, probe) = screen(2, 1);
        let handle = screen.clone();
        let id = handle.create_surface(Rect::new(0, 0, 2, 1));
        screen.paint(id, |buf| {
            buf.print_clipped(0, 0, "ok", ColorPair::WhiteBlack, 2);
        });
        screen.show_surface(id).unwrap();
        assert_eq!(probe.last_lines(), vec!["ok"]);
    }
}
