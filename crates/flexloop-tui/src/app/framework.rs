//! Application trait and the per-render frame

use crate::buffer::Buffer;
use crate::command::Command;
use crate::event::Event;
use crate::geometry::Rect;
use crate::mouse::{MouseRegion, RegionRegistry};
use crate::view::View;

/// Application trait for implementing TUI apps
///
/// Elm-style: the runtime owns the loop, feeds events to `update`, and calls
/// `view` whenever a frame is due. All four hooks run on the event-loop
/// worker, one at a time.
pub trait App: Send {
    /// Application-defined message type carried by [`Event::Message`]
    type Message: Send + 'static;

    /// Called once before the terminal is touched; an error aborts the run
    fn init(&mut self) -> anyhow::Result<Command<Self::Message>> {
        Ok(Command::none())
    }

    /// Handle an event and update state
    fn update(&mut self, event: Event<Self::Message>) -> Command<Self::Message>;

    /// Render the current state and register this frame's mouse regions
    fn view(&self, frame: &mut Frame<'_, Self::Message>);

    /// Called once after the terminal has been restored
    fn teardown(&mut self) {}
}

/// Drawing surface for one render pass
pub struct Frame<'a, M> {
    area: Rect,
    index: u64,
    buffer: &'a mut Buffer,
    regions: &'a mut RegionRegistry<M>,
}

impl<'a, M> Frame<'a, M> {
    pub fn new(area: Rect, index: u64, buffer: &'a mut Buffer, regions: &'a mut RegionRegistry<M>) -> Self {
        Self {
            area,
            index,
            buffer,
            regions,
        }
    }

    /// Full drawable area
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Sequence number of this frame, starting at 1
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Render `view` into `area`
    pub fn render<V: View + ?Sized>(&mut self, view: &V, area: Rect) {
        view.render(area, &mut *self.buffer);
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut *self.buffer
    }

    /// Register a region for this frame only
    pub fn register(&mut self, region: MouseRegion<M>) {
        self.regions.register(region);
    }

    pub fn regions(&self) -> &RegionRegistry<M> {
        &*self.regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Style;
    use crate::event::Interaction;
    use crate::layout::Stack;
    use crate::view::Text;

    struct Counter {
        count: u32,
    }

    impl App for Counter {
        type Message = u32;

        fn update(&mut self, event: Event<u32>) -> Command<u32> {
            if let Event::Message(n) = event {
                self.count += n;
            }
            Command::none()
        }

        fn view(&self, frame: &mut Frame<'_, u32>) {
            let area = frame.area();
            frame.render(&Text::new(format!("Count: {}", self.count)), area);
            frame.register(MouseRegion::new("count", area).on_message(Interaction::Click, 1));
        }
    }

    #[test]
    fn test_app_init_default_is_none() {
        let mut app = Counter { count: 0 };
        assert!(app.init().unwrap().is_none());
    }

    #[test]
    fn test_app_view_renders_and_registers() {
        let mut app = Counter { count: 0 };
        let _ = app.update(Event::Message(42));

        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::new(area);
        let mut regions = RegionRegistry::new();
        let mut frame = Frame::new(area, 1, &mut buf, &mut regions);
        app.view(&mut frame);

        assert_eq!(buf.get(0, 0).unwrap().symbol, "C");
        assert_eq!(buf.get(7, 0).unwrap().symbol, "4");
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_frame_render_stack() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::new(area);
        let mut regions: RegionRegistry<()> = RegionRegistry::new();
        let mut frame = Frame::new(area, 3, &mut buf, &mut regions);

        let row = Stack::horizontal()
            .child(Text::new("a").style(Style::default().bold()))
            .gap(1)
            .child(Text::new("b"));
        frame.render(&row, area);
        assert_eq!(frame.index(), 3);

        assert_eq!(buf.row_text(0).trim_end(), "a b");
    }
}
