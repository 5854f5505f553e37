//! Cell-space geometry shared by layout, rendering and mouse hit-testing

mod point;
mod rect;
mod size;

pub use point::Point;
pub use rect::Rect;
pub use size::Size;
