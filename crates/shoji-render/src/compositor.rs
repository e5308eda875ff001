#![forbid(unsafe_code)]

//! Z-ordered surface stack.
//!
//! Each surface owns a buffer and a window rectangle on the screen. The
//! compositor blits visible surfaces bottom-to-top into a screen-sized
//! frame; later surfaces in the stack overdraw earlier ones, so raising
//! a surface moves it to the end of the stack.

use crate::buffer::Buffer;
use shoji_core::geometry::Rect;

/// Opaque handle to a surface in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

struct Surface {
    id: SurfaceId,
    rect: Rect,
    buffer: Buffer,
    visible: bool,
}

/// Owns the surface stack and composes it into one frame.
#[derive(Default)]
pub struct Compositor {
    surfaces: Vec<Surface>,
    next_id: u64,
}

impl Compositor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hidden surface on top of the stack.
    pub fn create(&mut self, rect: Rect) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.surfaces.push(Surface {
            id,
            rect,
            buffer: Buffer::new(rect.width, rect.height),
            visible: false,
        });
        id
    }

    /// Drop a surface. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: SurfaceId) {
        self.surfaces.retain(|s| s.id != id);
    }

    fn find(&self, id: SurfaceId) -> Option<usize> {
        self.surfaces.iter().position(|s| s.id == id)
    }

    /// Window rectangle of a surface.
    #[must_use]
    pub fn rect(&self, id: SurfaceId) -> Option<Rect> {
        self.find(id).map(|i| self.surfaces[i].rect)
    }

    /// Move and resize a surface. The buffer is reallocated blank when
    /// the size changes.
    pub fn set_rect(&mut self, id: SurfaceId, rect: Rect) {
        if let Some(i) = self.find(id) {
            let surface = &mut self.surfaces[i];
            if surface.buffer.width() != rect.width || surface.buffer.height() != rect.height {
                surface.buffer = Buffer::new(rect.width, rect.height);
            }
            surface.rect = rect;
        }
    }

    /// Mutable access to a surface's buffer for painting.
    pub fn buffer_mut(&mut self, id: SurfaceId) -> Option<&mut Buffer> {
        self.find(id).map(|i| &mut self.surfaces[i].buffer)
    }

    /// Make a surface visible and raise it to the top of the stack.
    pub fn show(&mut self, id: SurfaceId) {
        self.raise(id);
        if let Some(i) = self.find(id) {
            self.surfaces[i].visible = true;
        }
    }

    /// Hide a surface without removing it.
    pub fn hide(&mut self, id: SurfaceId) {
        if let Some(i) = self.find(id) {
            self.surfaces[i].visible = false;
        }
    }

    /// Move a surface to the top of the stack.
    pub fn raise(&mut self, id: SurfaceId) {
        if let Some(i) = self.find(id) {
            let surface = self.surfaces.remove(i);
            self.surfaces.push(surface);
        }
    }

    #[must_use]
    pub fn is_visible(&self, id: SurfaceId) -> bool {
        self.find(id).is_some_and(|i| self.surfaces[i].visible)
    }

    /// Blit all visible surfaces bottom-to-top into `frame`, clipping
    /// each to the frame bounds.
    pub fn compose(&self, frame: &mut Buffer) {
        frame.erase();
        for surface in self.surfaces.iter().filter(|s| s.visible) {
            let rect = surface.rect;
            for dy in 0..rect.height.min(surface.buffer.height()) {
                let y = rect.y.saturating_add(dy);
                if y >= frame.height() {
                    break;
                }
                for dx in 0..rect.width.min(surface.buffer.width()) {
                    let x = rect.x.saturating_add(dx);
                    if x >= frame.width() {
                        break;
                    }
                    if let Some(cell) = surface.buffer.get(dx, dy) {
                        frame.set(x, y, *cell);
                    }
                }
            }
        }
    }
}
