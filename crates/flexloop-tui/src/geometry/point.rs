//! Cell coordinates

/// A cell coordinate, column first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance in cells.
    ///
    /// A diagonal step counts as one cell, which is how a pointer moving
    /// across a character grid is perceived.
    pub fn distance(self, other: Point) -> u16 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl From<(u16, u16)> for Point {
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(3, 4);
        let b = Point::new(7, 2);
        assert_eq!(a.distance(b), 4);
        assert_eq!(b.distance(a), 4);
    }

    #[test]
    fn test_distance_diagonal_counts_once() {
        assert_eq!(Point::new(0, 0).distance(Point::new(2, 2)), 2);
        assert_eq!(Point::new(5, 5).distance(Point::new(5, 5)), 0);
    }
}
