//! Inline backend: a live region pinned below ordinary terminal output

use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

use super::draw::CellWriter;
use super::{Backend, TerminalGuard};
use crate::buffer::Buffer;
use crate::config::TerminalConfig;
use crate::geometry::Size;

struct Surface<W> {
    out: W,
    live: Option<Buffer>,
    /// Rows the live region currently occupies on screen
    live_height: u16,
}

impl<W: Write> Surface<W> {
    /// Erase the live region, leaving the cursor where it started
    fn clear_live(&mut self) -> io::Result<()> {
        if self.live_height == 0 {
            return Ok(());
        }
        queue!(self.out, MoveToColumn(0))?;
        if self.live_height > 1 {
            queue!(self.out, MoveUp(self.live_height - 1))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        self.live_height = 0;
        Ok(())
    }

    fn paint_live(&mut self) -> io::Result<()> {
        let Some(buffer) = &self.live else {
            return Ok(());
        };
        let area = buffer.area();
        let height = buffer.content_height();

        let mut writer = CellWriter::new(&mut self.out);
        for row in 0..height {
            if row > 0 {
                writer.newline()?;
            }
            writer.put_row(buffer, area.y + row)?;
        }
        self.live_height = height;
        Ok(())
    }
}

fn lock<W>(surface: &Mutex<Surface<W>>) -> MutexGuard<'_, Surface<W>> {
    surface.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Renders the live region below whatever was printed before it
///
/// Output that should scroll away permanently goes through a
/// [`ScrollbackPrinter`] obtained from [`InlineBackend::printer`].
pub struct InlineBackend<W: Write + Send = Stdout> {
    surface: Arc<Mutex<Surface<W>>>,
    width: Option<u16>,
    guard: Option<TerminalGuard>,
}

impl InlineBackend<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> InlineBackend<W> {
    pub fn new(out: W) -> Self {
        Self {
            surface: Arc::new(Mutex::new(Surface {
                out,
                live: None,
                live_height: 0,
            })),
            width: None,
            guard: None,
        }
    }

    /// A handle for writing lines above the live region
    pub fn printer(&self) -> ScrollbackPrinter<W> {
        ScrollbackPrinter {
            surface: self.surface.clone(),
        }
    }
}

impl<W: Write + Send> Backend for InlineBackend<W> {
    fn size(&self) -> io::Result<Size> {
        super::terminal_size(self.width)
    }

    fn enter(&mut self, features: &TerminalConfig) -> io::Result<()> {
        self.width = features.width;
        if self.guard.is_none() {
            let mut surface = lock(&self.surface);
            self.guard = Some(TerminalGuard::acquire(&mut surface.out, features, false)?);
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        let mut surface = lock(&self.surface);
        // Leave the last frame on screen and start the shell below it
        if surface.live_height > 0 {
            queue!(surface.out, Print("\r\n"))?;
        }
        surface.live = None;
        surface.live_height = 0;
        surface.out.flush()?;
        match self.guard.take() {
            Some(guard) => guard.release(&mut surface.out),
            None => Ok(()),
        }
    }

    fn draw(&mut self, buffer: &Buffer) -> io::Result<()> {
        let mut surface = lock(&self.surface);
        surface.clear_live()?;
        surface.live = Some(buffer.clone());
        surface.paint_live()?;
        surface.out.flush()
    }
}

/// Prints lines into the scrollback above an inline live region
///
/// Clearing the live region, writing, and repainting it happen under one lock,
/// so concurrent prints and frames never interleave.
pub struct ScrollbackPrinter<W: Write + Send = Stdout> {
    surface: Arc<Mutex<Surface<W>>>,
}

impl<W: Write + Send> Clone for ScrollbackPrinter<W> {
    fn clone(&self) -> Self {
        Self {
            surface: self.surface.clone(),
        }
    }
}

impl<W: Write + Send> ScrollbackPrinter<W> {
    pub fn println(&self, text: &str) -> io::Result<()> {
        let mut surface = lock(&self.surface);
        surface.clear_live()?;
        for line in text.split('\n') {
            queue!(surface.out, Print(line), Print("\r\n"))?;
        }
        surface.paint_live()?;
        trace!(lines = text.split('\n').count(), "printed above live region");
        surface.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Style;
    use crate::geometry::Rect;

    fn output(backend: &InlineBackend<Vec<u8>>) -> String {
        String::from_utf8_lossy(&lock(&backend.surface).out).into_owned()
    }

    fn frame(lines: &[&str]) -> Buffer {
        let mut buf = Buffer::new(Rect::sized(20, 5));
        for (y, line) in lines.iter().enumerate() {
            buf.print(0, y as u16, line, Style::default());
        }
        buf
    }

    #[test]
    fn test_live_height_follows_content() {
        let mut backend = InlineBackend::new(Vec::new());
        backend.draw(&frame(&["one", "two"])).unwrap();
        assert_eq!(lock(&backend.surface).live_height, 2);

        backend.draw(&frame(&["only"])).unwrap();
        assert_eq!(lock(&backend.surface).live_height, 1);
    }

    #[test]
    fn test_println_goes_above_live_region() {
        let mut backend = InlineBackend::new(Vec::new());
        backend.draw(&frame(&["status"])).unwrap();
        let before = output(&backend).len();

        backend.printer().println("log line").unwrap();
        let written = output(&backend)[before..].to_string();

        let log_at = written.find("log line").unwrap();
        let status_at = written.rfind("status").unwrap();
        assert!(log_at < status_at, "live region must be repainted after the line");
    }

    #[test]
    fn test_println_before_first_frame() {
        let backend = InlineBackend::new(Vec::new());
        backend.printer().println("early").unwrap();
        assert!(output(&backend).contains("early\r\n"));
    }
}
