//! Flexible-box layout: fixed children keep their intrinsic size, flexible
//! children share what is left in proportion to their weights

mod direction;
mod flex;
mod stack;

pub use direction::{Align, Direction};
pub use flex::Flex;
pub use stack::{LayoutChild, Stack};
