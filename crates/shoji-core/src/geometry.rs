#![forbid(unsafe_code)]

//! Geometric primitives and declarative panel extents.
//!
//! Panels describe each dimension with an [`Extent`] rather than a fixed
//! number, so geometry can be recomputed against live content and the
//! current screen size. Resolution always clamps to the physical screen.

/// A rectangle in terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A declarative size or position for one panel dimension.
///
/// Mirrors the inputs a panel constructor accepts: unset (auto-size to
/// content / center on screen), an absolute cell count, an inset from the
/// full screen edge, or a fraction of the full screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Extent {
    /// Size to content, or center on screen for positions.
    #[default]
    Auto,
    /// Absolute number of cells.
    Cells(u16),
    /// Full screen minus this many cells inset from each edge.
    Inset(u16),
    /// Fraction of the full screen dimension, in (0, 1).
    Fraction(f32),
}

impl Extent {
    /// Resolve a length extent against the screen dimension.
    ///
    /// `content` is the length the panel would need to show all of its
    /// content (used by `Auto`). The result is clamped to `screen`.
    #[must_use]
    pub fn resolve_length(&self, screen: u16, content: u16) -> u16 {
        let resolved = match *self {
            Extent::Auto => content,
            Extent::Cells(n) => n,
            Extent::Inset(n) => screen.saturating_sub(n.saturating_mul(2)),
            Extent::Fraction(f) => {
                let f = f.clamp(0.0, 1.0);
                (f64::from(screen) * f64::from(f)) as u16
            }
        };
        resolved.min(screen)
    }

    /// Resolve a position extent against the screen dimension.
    ///
    /// `length` is the already-resolved panel length on this axis; `Auto`
    /// centers the panel. The result keeps the panel on screen.
    #[must_use]
    pub fn resolve_position(&self, screen: u16, length: u16) -> u16 {
        let resolved = match *self {
            Extent::Auto => screen.saturating_sub(length) / 2,
            Extent::Cells(n) => n,
            Extent::Inset(n) => n,
            Extent::Fraction(f) => {
                let f = f.clamp(0.0, 1.0);
                (f64::from(screen) * f64::from(f)) as u16
            }
        };
        resolved.min(screen.saturating_sub(length))
    }
}

/// The four declarative extents describing a panel's window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelExtents {
    pub top: Extent,
    pub left: Extent,
    pub width: Extent,
    pub height: Extent,
}

impl PanelExtents {
    /// Centered on screen, auto-sized to content.
    #[must_use]
    pub const fn auto() -> Self {
        Self {
            top: Extent::Auto,
            left: Extent::Auto,
            width: Extent::Auto,
            height: Extent::Auto,
        }
    }

    /// Resolve into a concrete window rectangle.
    ///
    /// `content_width`/`content_height` are the sizes an auto-sized panel
    /// needs (content plus border/padding); both are clamped to the
    /// screen before positioning.
    #[must_use]
    pub fn resolve(
        &self,
        screen_width: u16,
        screen_height: u16,
        content_width: u16,
        content_height: u16,
    ) -> Rect {
        let width = self.width.resolve_length(screen_width, content_width);
        let height = self.height.resolve_length(screen_height, content_height);
        let left = self.left.resolve_position(screen_width, width);
        let top = self.top.resolve_position(screen_height, height);
        Rect::new(left, top, width, height)
    }
}
