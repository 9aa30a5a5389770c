/// Viewport rectangle in integer pixels, bottom-left origin.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(left: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self { left, bottom, width, height }
    }

    /// The zero-area viewport given to disabled camera slots.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(self) -> i32 {
        self.left + self.width
    }

    /// Exclusive top edge.
    #[inline]
    pub const fn top(self) -> i32 {
        self.bottom + self.height
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub const fn area(self) -> i64 {
        if self.is_empty() { 0 } else { self.width as i64 * self.height as i64 }
    }

    /// Converts to `(x, y, w, h)` with a top-left origin for a surface of
    /// `surface_height` pixels, clipped to the surface bounds.
    ///
    /// Returns `None` when nothing of the rect is visible.
    pub fn to_top_left(self, surface_width: u32, surface_height: u32) -> Option<(u32, u32, u32, u32)> {
        if self.is_empty() {
            return None;
        }
        let sw = surface_width as i64;
        let sh = surface_height as i64;

        let x0 = (self.left as i64).clamp(0, sw);
        let x1 = (self.right() as i64).clamp(0, sw);
        let y0 = (sh - self.top() as i64).clamp(0, sh);
        let y1 = (sh - self.bottom as i64).clamp(0, sh);

        let (w, h) = (x1 - x0, y1 - y0);
        if w <= 0 || h <= 0 {
            None
        } else {
            Some((x0 as u32, y0 as u32, w as u32, h as u32))
        }
    }
}
