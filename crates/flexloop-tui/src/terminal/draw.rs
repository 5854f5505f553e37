//! Writing cells to a terminal stream

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute, SetAttributes, SetBackgroundColor, SetForegroundColor},
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

use crate::buffer::{Buffer, Cell, Style};

/// Queues cells on a writer, emitting cursor moves and style changes only
/// when they differ from what the terminal already has
pub(crate) struct CellWriter<'w, W: Write> {
    out: &'w mut W,
    cursor: Option<(u16, u16)>,
    style: Option<Style>,
}

impl<'w, W: Write> CellWriter<'w, W> {
    pub(crate) fn new(out: &'w mut W) -> Self {
        Self {
            out,
            cursor: None,
            style: None,
        }
    }

    /// Write a cell at an absolute position. Continuation cells are skipped
    /// since the wide glyph before them already covers them.
    pub(crate) fn put(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if cell.is_continuation() {
            return Ok(());
        }
        if self.cursor != Some((x, y)) {
            queue!(self.out, MoveTo(x, y))?;
        }
        self.print(cell)?;
        self.cursor = Some((x.saturating_add(symbol_width(cell)), y));
        Ok(())
    }

    /// Write one buffer row at the current cursor position, without its
    /// trailing blank cells
    pub(crate) fn put_row(&mut self, buffer: &Buffer, y: u16) -> io::Result<()> {
        let area = buffer.area();
        let end = (area.x..area.right())
            .rev()
            .find(|&x| buffer.get(x, y).is_some_and(|cell| !cell.is_blank()))
            .map_or(area.x, |x| x + 1);
        for x in area.x..end {
            if let Some(cell) = buffer.get(x, y) {
                if !cell.is_continuation() {
                    self.print(cell)?;
                }
            }
        }
        self.reset()
    }

    /// Move to the start of the next line, relative to the cursor
    pub(crate) fn newline(&mut self) -> io::Result<()> {
        self.cursor = None;
        queue!(self.out, Print("\r\n"))
    }

    /// Return to default colors and attributes
    pub(crate) fn reset(&mut self) -> io::Result<()> {
        if self.style.take().is_some() {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    fn print(&mut self, cell: &Cell) -> io::Result<()> {
        if self.style != Some(cell.style) {
            self.apply(cell.style)?;
        }
        queue!(self.out, Print(&cell.symbol))
    }

    fn apply(&mut self, style: Style) -> io::Result<()> {
        // Reset clears colors as well as attributes
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        if let Some(fg) = style.fg {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        if let Some(bg) = style.bg {
            queue!(self.out, SetBackgroundColor(bg))?;
        }
        if !style.attributes.is_empty() {
            queue!(self.out, SetAttributes(style.attributes))?;
        }
        self.style = Some(style);
        Ok(())
    }
}

fn symbol_width(cell: &Cell) -> u16 {
    cell.symbol.width().max(1) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn rendered(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_consecutive_cells_share_one_move() {
        let mut out = Vec::new();
        let mut writer = CellWriter::new(&mut out);
        writer.put(0, 0, &Cell::new("a")).unwrap();
        writer.put(1, 0, &Cell::new("b")).unwrap();
        writer.reset().unwrap();

        let text = rendered(&out);
        assert_eq!(text.matches("\u{1b}[1;1H").count(), 1);
        assert!(text.contains("ab"));
    }

    #[test]
    fn test_continuation_cells_are_skipped() {
        let mut buf = Buffer::new(Rect::new(0, 0, 4, 1));
        buf.print(0, 0, "世a", Style::default());

        let mut out = Vec::new();
        CellWriter::new(&mut out).put_row(&buf, 0).unwrap();

        let text = rendered(&out);
        assert!(text.contains("世a"));
    }
}
