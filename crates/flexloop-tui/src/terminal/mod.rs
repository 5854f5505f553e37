//! Terminal backends
//!
//! The runtime only talks to a [`Backend`]: it asks for the size, hands over
//! finished buffers, and brackets the run with `enter` / `restore`.

mod draw;
mod fullscreen;
mod guard;
mod inline;
mod test_backend;

use std::io;

use crate::buffer::Buffer;
use crate::config::TerminalConfig;
use crate::geometry::Size;

pub use fullscreen::FullscreenBackend;
pub use guard::TerminalGuard;
pub use inline::{InlineBackend, ScrollbackPrinter};
pub use test_backend::TestBackend;

/// Where rendered frames go
pub trait Backend {
    /// Drawable size in cells
    fn size(&self) -> io::Result<Size>;

    /// Switch the terminal into the modes `features` asks for
    fn enter(&mut self, features: &TerminalConfig) -> io::Result<()>;

    /// Undo everything `enter` did; safe to call when not entered
    fn restore(&mut self) -> io::Result<()>;

    /// Present a finished frame
    fn draw(&mut self, buffer: &Buffer) -> io::Result<()>;

    /// Forget what is on screen so the next draw repaints everything
    fn invalidate(&mut self) {}
}

/// Current terminal size, at most `width` columns wide when set
fn terminal_size(width: Option<u16>) -> io::Result<Size> {
    let (columns, rows) = crossterm::terminal::size()?;
    Ok(cap_width(Size::new(columns, rows), width))
}

fn cap_width(size: Size, width: Option<u16>) -> Size {
    Size::new(width.map_or(size.width, |w| w.min(size.width)), size.height)
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn size(&self) -> io::Result<Size> {
        (**self).size()
    }

    fn enter(&mut self, features: &TerminalConfig) -> io::Result<()> {
        (**self).enter(features)
    }

    fn restore(&mut self) -> io::Result<()> {
        (**self).restore()
    }

    fn draw(&mut self, buffer: &Buffer) -> io::Result<()> {
        (**self).draw(buffer)
    }

    fn invalidate(&mut self) {
        (**self).invalidate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_override_never_exceeds_terminal() {
        let terminal = Size::new(120, 40);
        assert_eq!(cap_width(terminal, None), terminal);
        assert_eq!(cap_width(terminal, Some(80)), Size::new(80, 40));
        assert_eq!(cap_width(terminal, Some(200)), terminal);
    }
}
