//! Leaf views used to assemble layouts

use unicode_width::UnicodeWidthStr;

use super::View;
use crate::buffer::{Buffer, Style};
use crate::geometry::{Rect, Size};
use crate::layout::Flex;

/// A single line of styled text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    content: String,
    style: Style,
}

impl Text {
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl View for Text {
    fn size(&self, max_width: u16, _max_height: u16) -> Size {
        let width = self.content.width().min(u16::MAX as usize) as u16;
        if width == 0 {
            return Size::ZERO;
        }
        Size::new(width, 1).clamp_to(Size::new(max_width, 0))
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.print_clipped(area.x, area.y, &self.content, self.style, area.width);
    }
}

/// Flexible filler that pushes its siblings apart
///
/// It only knows how to fill: measured without a budget it reports `(0, 0)`
/// and disappears from the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacer {
    weight: u16,
}

impl Spacer {
    pub fn new() -> Self {
        Self { weight: 1 }
    }

    pub fn weighted(weight: u16) -> Self {
        Self { weight }
    }
}

impl Default for Spacer {
    fn default() -> Self {
        Self::new()
    }
}

impl View for Spacer {
    fn size(&self, _max_width: u16, _max_height: u16) -> Size {
        Size::ZERO
    }

    fn render(&self, _area: Rect, _buf: &mut Buffer) {}

    fn flex(&self) -> Flex {
        Flex::from_weight(self.weight)
    }
}

/// Renders nothing and takes no space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

impl View for Empty {
    fn size(&self, _max_width: u16, _max_height: u16) -> Size {
        Size::ZERO
    }

    fn render(&self, _area: Rect, _buf: &mut Buffer) {}
}

/// Gives any view a flex weight
pub struct Flexible<V> {
    inner: V,
    weight: u16,
}

impl<V: View> Flexible<V> {
    pub fn new(inner: V, weight: u16) -> Self {
        Self { inner, weight }
    }
}

impl<V: View> View for Flexible<V> {
    fn size(&self, max_width: u16, max_height: u16) -> Size {
        self.inner.size(max_width, max_height)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        self.inner.render(area, buf)
    }

    fn flex(&self) -> Flex {
        Flex::from_weight(self.weight)
    }
}

/// Shows `inner` only while `visible` holds; hidden it behaves like [`Empty`]
pub struct When<V> {
    visible: bool,
    inner: V,
}

impl<V: View> When<V> {
    pub fn new(visible: bool, inner: V) -> Self {
        Self { visible, inner }
    }
}

impl<V: View> View for When<V> {
    fn size(&self, max_width: u16, max_height: u16) -> Size {
        if self.visible {
            self.inner.size(max_width, max_height)
        } else {
            Size::ZERO
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        if self.visible {
            self.inner.render(area, buf);
        }
    }

    fn flex(&self) -> Flex {
        if self.visible {
            self.inner.flex()
        } else {
            Flex::Fixed
        }
    }
}
