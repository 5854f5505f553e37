//! Layout axes

use crate::geometry::{Rect, Size};
use crate::view::View;

/// Main axis of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Children placed left to right
    #[default]
    Horizontal,
    /// Children placed top to bottom
    Vertical,
}

impl Direction {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Horizontal)
    }

    /// Extent of `size` along the main axis
    pub fn main(self, size: Size) -> u16 {
        match self {
            Direction::Horizontal => size.width,
            Direction::Vertical => size.height,
        }
    }

    /// Extent of `size` along the cross axis
    pub fn cross(self, size: Size) -> u16 {
        match self {
            Direction::Horizontal => size.height,
            Direction::Vertical => size.width,
        }
    }

    /// Build a size from main/cross extents
    pub fn size(self, main: u16, cross: u16) -> Size {
        match self {
            Direction::Horizontal => Size::new(main, cross),
            Direction::Vertical => Size::new(cross, main),
        }
    }

    /// Ask `view` for its size with constraints expressed in axis terms
    pub fn measure(self, view: &dyn View, max_main: u16, max_cross: u16) -> Size {
        let max = self.size(max_main, max_cross);
        view.size(max.width, max.height)
    }

    /// Rectangle inside `area` at the given axis offsets and extents
    pub fn rect(self, area: Rect, main_offset: u16, cross_offset: u16, main: u16, cross: u16) -> Rect {
        match self {
            Direction::Horizontal => Rect::new(
                area.x.saturating_add(main_offset),
                area.y.saturating_add(cross_offset),
                main,
                cross,
            ),
            Direction::Vertical => Rect::new(
                area.x.saturating_add(cross_offset),
                area.y.saturating_add(main_offset),
                cross,
                main,
            ),
        }
    }
}

/// Placement of a child along the cross axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

impl Align {
    /// Offset of an item of extent `item` inside `available` cells
    pub fn offset(self, available: u16, item: u16) -> u16 {
        let slack = available.saturating_sub(item);
        match self {
            Align::Start => 0,
            Align::Center => slack / 2,
            Align::End => slack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_mapping_round_trips() {
        let size = Size::new(7, 3);
        for dir in [Direction::Horizontal, Direction::Vertical] {
            assert_eq!(dir.size(dir.main(size), dir.cross(size)), size);
        }
        assert_eq!(Direction::Vertical.main(size), 3);
    }

    #[test]
    fn test_vertical_rect_swaps_axes() {
        let area = Rect::new(10, 20, 30, 40);
        assert_eq!(
            Direction::Vertical.rect(area, 5, 2, 4, 6),
            Rect::new(12, 25, 6, 4)
        );
    }

    #[test]
    fn test_align_offsets() {
        assert_eq!(Align::Start.offset(10, 4), 0);
        assert_eq!(Align::Center.offset(10, 4), 3);
        assert_eq!(Align::End.offset(10, 4), 6);
        // Oversized items pin to the start
        assert_eq!(Align::End.offset(3, 9), 0);
    }
}
