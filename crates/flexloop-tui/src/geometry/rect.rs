//! Rectangular cell regions

use super::{Point, Size};

/// A rectangular region of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle anchored at the origin
    pub const fn sized(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Number of cells covered
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Overlap of two rectangles, empty when they are disjoint
    pub fn intersect(&self, other: &Rect) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x >= right || y >= bottom {
            Self::empty()
        } else {
            Self::new(x, y, right - x, bottom - y)
        }
    }

    /// Row-major iterator over every cell position
    pub fn positions(&self) -> impl Iterator<Item = (u16, u16)> {
        let (left, right) = (self.x, self.right());
        (self.y..self.bottom()).flat_map(move |y| (left..right).map(move |x| (x, y)))
    }
}

impl From<(u16, u16, u16, u16)> for Rect {
    fn from((x, y, width, height): (u16, u16, u16, u16)) -> Self {
        Self::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(2, 2, 3, 2);
        assert!(r.contains(Point::new(2, 2)));
        assert!(r.contains(Point::new(4, 3)));
        assert!(!r.contains(Point::new(5, 2)));
        assert!(!r.contains(Point::new(2, 4)));
        assert!(!Rect::empty().contains(Point::new(0, 0)));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&Rect::new(5, 5, 10, 10)), Rect::new(5, 5, 5, 5));
        assert!(a.intersect(&Rect::new(10, 0, 4, 4)).is_empty());
    }

    #[test]
    fn test_saturating_edges() {
        let r = Rect::new(u16::MAX - 1, 0, 10, 1);
        assert_eq!(r.right(), u16::MAX);
    }

    #[test]
    fn test_positions_row_major() {
        let cells: Vec<_> = Rect::new(1, 1, 2, 2).positions().collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    }
}
