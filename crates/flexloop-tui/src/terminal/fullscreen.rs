//! Alternate-screen backend with diff rendering

use crossterm::{
    queue,
    style::ResetColor,
    terminal::{Clear, ClearType},
};
use std::io::{self, Stdout, Write};

use super::draw::CellWriter;
use super::{Backend, TerminalGuard};
use crate::buffer::Buffer;
use crate::config::TerminalConfig;
use crate::geometry::Size;

/// Owns the whole screen while entered
///
/// Only cells that changed since the previous frame are written; a resize or
/// [`Backend::invalidate`] forces a full repaint.
pub struct FullscreenBackend<W: Write = Stdout> {
    out: W,
    previous: Option<Buffer>,
    width: Option<u16>,
    guard: Option<TerminalGuard>,
}

impl FullscreenBackend<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> FullscreenBackend<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: None,
            width: None,
            guard: None,
        }
    }

    pub fn is_entered(&self) -> bool {
        self.guard.is_some()
    }

    fn draw_full(&mut self, buffer: &Buffer) -> io::Result<()> {
        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        let mut writer = CellWriter::new(&mut self.out);
        for (x, y, cell) in buffer.iter() {
            writer.put(x, y, cell)?;
        }
        writer.reset()
    }

    fn draw_diff(&mut self, buffer: &Buffer, previous: &Buffer) -> io::Result<()> {
        let mut writer = CellWriter::new(&mut self.out);
        for (x, y, cell) in buffer.diff(previous) {
            writer.put(x, y, cell)?;
        }
        writer.reset()
    }
}

impl<W: Write> Backend for FullscreenBackend<W> {
    fn size(&self) -> io::Result<Size> {
        super::terminal_size(self.width)
    }

    fn enter(&mut self, features: &TerminalConfig) -> io::Result<()> {
        self.width = features.width;
        if self.guard.is_none() {
            self.guard = Some(TerminalGuard::acquire(&mut self.out, features, true)?);
        }
        self.previous = None;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.previous = None;
        match self.guard.take() {
            Some(guard) => guard.release(&mut self.out),
            None => Ok(()),
        }
    }

    fn draw(&mut self, buffer: &Buffer) -> io::Result<()> {
        match self.previous.take() {
            Some(previous) if previous.area() == buffer.area() => {
                self.draw_diff(buffer, &previous)?;
            }
            _ => self.draw_full(buffer)?,
        }
        self.previous = Some(buffer.clone());
        self.out.flush()
    }

    fn invalidate(&mut self) {
        self.previous = None;
    }
}
