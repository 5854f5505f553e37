//! Cell buffer that views render into and backends flush

mod buffer;
mod cell;

pub use buffer::Buffer;
pub use cell::{Cell, Style};
