//! Events flowing through the runtime queue and the input reader that
//! produces most of them

mod input;
mod mouse;
pub(crate) mod reader;
mod shift_enter;

pub use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton};
pub use input::Event;
pub use mouse::{Interaction, MouseEvent, MouseEventKind, ScrollDirection};
pub use reader::{ChannelInput, CrosstermInput, InputSource};
