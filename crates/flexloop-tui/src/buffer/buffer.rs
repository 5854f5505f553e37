//! Row-major grid of cells

use super::{Cell, Style};
use crate::geometry::Rect;
use unicode_width::UnicodeWidthChar;

/// Row-major grid of cells covering `area`
///
/// Writes outside the area are silently dropped, so views can render without
/// checking bounds themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    area: Rect,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            cells: vec![Cell::blank(); area.area() as usize],
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Blank every cell and adopt a new area
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.cells.clear();
        self.cells.resize(area.area() as usize, Cell::blank());
    }

    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset);
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.area.x || x >= self.area.right() || y < self.area.y || y >= self.area.bottom() {
            return None;
        }
        let col = (x - self.area.x) as usize;
        let row = (y - self.area.y) as usize;
        Some(row * self.area.width as usize + col)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Fill the part of `area` that overlaps the buffer
    pub fn fill(&mut self, area: Rect, cell: &Cell) {
        let clipped = self.area.intersect(&area);
        for (x, y) in clipped.positions() {
            self.set(x, y, cell.clone());
        }
    }

    /// Print `text` on one row starting at `(x, y)`, clipped to the buffer.
    ///
    /// Returns the number of columns consumed.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let limit = self.area.right().saturating_sub(x);
        self.print_clipped(x, y, text, style, limit)
    }

    /// Like [`Buffer::print`] but never writes more than `max_width` columns.
    ///
    /// A wide glyph that would straddle the limit is dropped rather than cut.
    pub fn print_clipped(&mut self, x: u16, y: u16, text: &str, style: Style, max_width: u16) -> u16 {
        let mut used = 0u16;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            if used + width > max_width {
                break;
            }
            let col = x.saturating_add(used);
            if let Some(cell) = self.get_mut(col, y) {
                cell.symbol.clear();
                cell.symbol.push(ch);
                cell.style = style;
            }
            for extra in 1..width {
                if let Some(cell) = self.get_mut(col.saturating_add(extra), y) {
                    cell.symbol.clear();
                    cell.style = style;
                }
            }
            used += width;
        }
        used
    }

    /// Iterate over every cell with its absolute position
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        self.area
            .positions()
            .zip(self.cells.iter())
            .map(|((x, y), cell)| (x, y, cell))
    }

    /// Cells that differ from `previous`.
    ///
    /// A previous buffer with a different area yields every cell.
    pub fn diff<'a>(&'a self, previous: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        let same_area = previous.area == self.area;
        self.iter()
            .zip(self.cells.iter().enumerate())
            .filter(move |(_, (i, cell))| !same_area || previous.cells[*i] != **cell)
            .map(|(entry, _)| entry)
    }

    /// Text of one row with continuation cells removed
    pub fn row_text(&self, y: u16) -> String {
        (self.area.x..self.area.right())
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    /// Number of rows up to and including the last row holding a non-blank cell
    pub fn content_height(&self) -> u16 {
        let width = self.area.width as usize;
        if width == 0 {
            return 0;
        }
        self.cells
            .chunks(width)
            .rposition(|row| row.iter().any(|cell| !cell.is_blank()))
            .map(|row| row as u16 + 1)
            .unwrap_or(0)
    }
}
