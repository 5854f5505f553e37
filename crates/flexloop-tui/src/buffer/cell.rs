//! A single terminal cell and the style applied to it

use crossterm::style::{Attribute, Attributes, Color};

/// Foreground, background and text attributes
///
/// Colors are passed through to crossterm untouched; no palette mapping is
/// done here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attributes: Attributes,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attributes: Attributes::none(),
        }
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.set(attribute);
        self
    }

    pub fn bold(self) -> Self {
        self.attribute(Attribute::Bold)
    }

    pub fn reversed(self) -> Self {
        self.attribute(Attribute::Reverse)
    }

    /// Layer `other` on top of this style; unset colors fall through
    pub fn patch(mut self, other: Style) -> Self {
        self.fg = other.fg.or(self.fg);
        self.bg = other.bg.or(self.bg);
        self.attributes.extend(other.attributes);
        self
    }
}

/// One terminal cell
///
/// A wide glyph occupies its own cell plus a continuation cell whose symbol is
/// empty; backends skip continuation cells when writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub symbol: String,
    pub style: Style,
}

impl Cell {
    /// A blank cell with the default style
    pub fn blank() -> Self {
        Self {
            symbol: " ".to_string(),
            style: Style::default(),
        }
    }

    pub fn new<S: Into<String>>(symbol: S) -> Self {
        Self {
            symbol: symbol.into(),
            style: Style::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_continuation(&self) -> bool {
        self.symbol.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.symbol == " " && self.style == Style::default()
    }

    pub fn reset(&mut self) {
        self.symbol.clear();
        self.symbol.push(' ');
        self.style = Style::default();
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}
