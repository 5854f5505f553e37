//! Application contract

mod framework;

pub use framework::{App, Frame};
