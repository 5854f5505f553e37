//! flexloop-tui: an event-driven terminal UI runtime with a flex layout engine
//!
//! This crate provides:
//! - Geometry primitives (`Rect`, `Point`, `Size`) and a cell `Buffer`
//! - A view contract and a two-pass flexible-box layout (`Stack`)
//! - Mouse gesture synthesis over per-frame clickable regions
//! - Commands: async work whose results re-enter as events
//! - A `Runtime` that serializes application code on one event-loop worker
//!   while input, commands and resize signals are handled concurrently
//! - Full-screen, inline and in-memory terminal backends

pub mod app;
pub mod buffer;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod mouse;
pub mod runtime;
pub mod terminal;
pub mod view;

// Re-export commonly used types
pub use app::{App, Frame};
pub use buffer::{Buffer, Cell, Style};
pub use command::Command;
pub use config::{GestureConfig, RuntimeConfig, ScreenMode, TerminalConfig};
pub use error::RuntimeError;
pub use event::{ChannelInput, CrosstermInput, Event, InputSource, MouseEvent, MouseEventKind};
pub use geometry::{Point, Rect, Size};
pub use layout::{Align, Direction, Flex, Stack};
pub use mouse::{MouseHandler, MouseRegion, RegionId, RegionRegistry};
pub use runtime::{Runtime, RuntimeHandle};
pub use terminal::{Backend, FullscreenBackend, InlineBackend, ScrollbackPrinter, TestBackend};
pub use view::{Empty, Flexible, Spacer, Text, View, When};
