//! Core view trait

use crate::buffer::Buffer;
use crate::geometry::{Rect, Size};
use crate::layout::Flex;

/// Anything that can be measured and drawn
///
/// `size` may be called several times per frame with different limits and
/// must not have side effects. A view that returns `(0, 0)` is treated as
/// absent by containers.
pub trait View {
    /// Preferred size within the given limits (0 = unconstrained)
    fn size(&self, max_width: u16, max_height: u16) -> Size;

    /// Draw into `area`; anything outside it must be left untouched
    fn render(&self, area: Rect, buf: &mut Buffer);

    /// Participation in leftover-space distribution
    fn flex(&self) -> Flex {
        Flex::Fixed
    }
}

impl<V: View + ?Sized> View for &V {
    fn size(&self, max_width: u16, max_height: u16) -> Size {
        (**self).size(max_width, max_height)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        (**self).render(area, buf)
    }

    fn flex(&self) -> Flex {
        (**self).flex()
    }
}

impl<V: View + ?Sized> View for Box<V> {
    fn size(&self, max_width: u16, max_height: u16) -> Size {
        (**self).size(max_width, max_height)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        (**self).render(area, buf)
    }

    fn flex(&self) -> Flex {
        (**self).flex()
    }
}

/// Conditional rendering: `None` measures as `(0, 0)` and draws nothing
impl<V: View> View for Option<V> {
    fn size(&self, max_width: u16, max_height: u16) -> Size {
        match self {
            Some(view) => view.size(max_width, max_height),
            None => Size::ZERO,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        if let Some(view) = self {
            view.render(area, buf);
        }
    }

    fn flex(&self) -> Flex {
        self.as_ref().map(View::flex).unwrap_or_default()
    }
}
