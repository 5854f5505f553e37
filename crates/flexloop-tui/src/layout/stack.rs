//! Single-axis flex container
//!
//! Sizing runs in two passes. Fixed children are measured first with the main
//! axis unconstrained, so they report their intrinsic extent. Whatever is left
//! of the main-axis budget is then split between flexible children by weight,
//! with the last flexible child taking the rounding remainder so the shares
//! always add up to exactly the leftover space.
//!
//! A child that measures `(0, 0)` is treated as absent: it takes no space, no
//! gap is reserved next to it and it is never rendered.

use std::cell::RefCell;

use super::{Align, Direction, Flex};
use crate::buffer::Buffer;
use crate::geometry::{Rect, Size};
use crate::view::View;

/// Classification and resolved size of one child for the current pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutChild {
    pub flex: Flex,
    pub size: Size,
}

impl LayoutChild {
    pub fn is_present(&self) -> bool {
        !self.size.is_zero()
    }
}

#[derive(Debug, Clone)]
struct Measured {
    constraints: (u16, u16),
    children: Vec<LayoutChild>,
    size: Size,
}

/// Row or column of child views
pub struct Stack<'a> {
    direction: Direction,
    children: Vec<Box<dyn View + 'a>>,
    gap: u16,
    align: Align,
    flex: Option<u16>,
    cache: RefCell<Option<Measured>>,
}

impl<'a> Stack<'a> {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            children: Vec::new(),
            gap: 0,
            align: Align::Start,
            flex: None,
            cache: RefCell::new(None),
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// Cells between two present children
    pub fn gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the container's own weight.
    ///
    /// Without this the container inherits the largest weight among its
    /// immediate children; `weight(0)` pins it to its intrinsic size.
    pub fn weight(mut self, weight: u16) -> Self {
        self.flex = Some(weight);
        self
    }

    pub fn child<V: View + 'a>(mut self, view: V) -> Self {
        self.push(view);
        self
    }

    pub fn push<V: View + 'a>(&mut self, view: V) {
        self.children.push(Box::new(view));
        self.cache.get_mut().take();
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Resolve every child for the given main/cross limits (0 = unconstrained)
    pub fn resolve(&self, max_main: u16, max_cross: u16) -> Vec<LayoutChild> {
        self.measure(max_main, max_cross).children
    }

    fn measure(&self, max_main: u16, max_cross: u16) -> Measured {
        if let Some(cached) = self.cache.borrow().as_ref() {
            if cached.constraints == (max_main, max_cross) {
                return cached.clone();
            }
        }
        let measured = self.compute(max_main, max_cross);
        *self.cache.borrow_mut() = Some(measured.clone());
        measured
    }

    fn compute(&self, max_main: u16, max_cross: u16) -> Measured {
        let dir = self.direction;
        let mut resolved: Vec<LayoutChild> = self
            .children
            .iter()
            .map(|child| LayoutChild {
                flex: Flex::from_weight(child.flex().weight()),
                size: Size::ZERO,
            })
            .collect();

        // Pass one: fixed children report their intrinsic main extent.
        for (child, slot) in self.children.iter().zip(resolved.iter_mut()) {
            if !slot.flex.is_flexible() {
                slot.size = dir.measure(child.as_ref(), 0, max_cross);
            }
        }

        let total_weight: u32 = resolved.iter().map(|c| c.flex.weight() as u32).sum();
        let flexible_count = resolved.iter().filter(|c| c.flex.is_flexible()).count();

        if max_main > 0 && total_weight > 0 {
            let present_fixed = resolved
                .iter()
                .filter(|c| !c.flex.is_flexible() && c.is_present())
                .count();
            let fixed_extent: u32 = resolved
                .iter()
                .filter(|c| !c.flex.is_flexible())
                .map(|c| dir.main(c.size) as u32)
                .sum();
            let gaps = self.gap as u32 * (present_fixed + flexible_count).saturating_sub(1) as u32;
            let remaining = (max_main as u32).saturating_sub(fixed_extent + gaps);

            // Pass two: split the leftover by weight, remainder to the last.
            let mut allocated = 0u32;
            let mut seen = 0usize;
            for (child, slot) in self.children.iter().zip(resolved.iter_mut()) {
                if !slot.flex.is_flexible() {
                    continue;
                }
                seen += 1;
                let share = if seen == flexible_count {
                    remaining - allocated
                } else {
                    remaining * slot.flex.weight() as u32 / total_weight
                };
                allocated += share;

                let share = share as u16;
                let reported = dir.measure(child.as_ref(), share, max_cross);
                slot.size = dir.size(share, dir.cross(reported));
            }
        } else {
            for (child, slot) in self.children.iter().zip(resolved.iter_mut()) {
                if slot.flex.is_flexible() {
                    slot.size = dir.measure(child.as_ref(), 0, max_cross);
                }
            }
        }

        let present = resolved.iter().filter(|c| c.is_present()).count();
        let main: u32 = resolved.iter().map(|c| dir.main(c.size) as u32).sum::<u32>()
            + self.gap as u32 * present.saturating_sub(1) as u32;
        let cross = resolved.iter().map(|c| dir.cross(c.size)).max().unwrap_or(0);

        Measured {
            constraints: (max_main, max_cross),
            size: dir.size(main.min(u16::MAX as u32) as u16, cross),
            children: resolved,
        }
    }

    /// Child rectangles inside `area`, one per child in insertion order.
    ///
    /// Absent children and children pushed entirely past the end of the
    /// container get an empty rectangle; the rest are clipped to `area`.
    pub fn arrange(&self, area: Rect) -> Vec<Rect> {
        let dir = self.direction;
        let area_main = dir.main(area.size());
        let area_cross = dir.cross(area.size());
        let measured = self.measure(area_main, area_cross);

        let mut rects = Vec::with_capacity(measured.children.len());
        let mut offset = 0u16;
        let mut placed_any = false;

        for child in &measured.children {
            if !child.is_present() {
                rects.push(Rect::empty());
                continue;
            }
            if placed_any {
                offset = offset.saturating_add(self.gap);
            }
            placed_any = true;

            let child_main = dir.main(child.size);
            if offset >= area_main {
                rects.push(Rect::empty());
                offset = offset.saturating_add(child_main);
                continue;
            }

            let main = child_main.min(area_main - offset);
            let cross = dir.cross(child.size).min(area_cross);
            let cross_offset = self.align.offset(area_cross, cross);
            rects.push(dir.rect(area, offset, cross_offset, main, cross));
            offset = offset.saturating_add(child_main);
        }
        rects
    }
}

impl View for Stack<'_> {
    fn size(&self, max_width: u16, max_height: u16) -> Size {
        let max = Size::new(max_width, max_height);
        self.measure(self.direction.main(max), self.direction.cross(max)).size
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        for (child, rect) in self.children.iter().zip(self.arrange(area)) {
            if !rect.is_empty() {
                child.render(rect, buf);
            }
        }
    }

    fn flex(&self) -> Flex {
        match self.flex {
            Some(weight) => Flex::from_weight(weight),
            None => Flex::from_weight(
                self.children.iter().map(|c| c.flex().weight()).max().unwrap_or(0),
            ),
        }
    }
}
