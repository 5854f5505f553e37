//! Extents measured in terminal cells

/// Width and height in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const ZERO: Size = Size::new(0, 0);

    /// Create a new size
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// True when both extents are zero.
    ///
    /// The layout engine treats such a view as absent: it takes no space and
    /// no gap is reserved next to it.
    pub const fn is_zero(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// True when nothing can be drawn (either extent is zero)
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clamp each extent to `max`, where a zero limit means unconstrained
    pub fn clamp_to(self, max: Size) -> Self {
        let clamp = |v: u16, limit: u16| if limit == 0 { v } else { v.min(limit) };
        Self::new(clamp(self.width, max.width), clamp(self.height, max.height))
    }
}

impl From<(u16, u16)> for Size {
    fn from((width, height): (u16, u16)) -> Self {
        Self { width, height }
    }
}
