//! Counter demo
//!
//! Exercises the runtime end to end: keyboard input, clickable regions laid
//! out by a `Stack`, synthesized gestures and a delayed command.

use crossterm::style::Color;
use flexloop_tui::event::{Interaction, KeyCode, MouseEventKind, ScrollDirection};
use flexloop_tui::{
    App, Command, Event, Frame, MouseRegion, Rect, Spacer, Stack, Style, Text, When,
};
use std::time::Duration;
use tracing::debug;

/// Delay between pressing reset and the counter going back to zero
pub const RESET_DELAY: Duration = Duration::from_millis(400);

/// Amount a double click adds on top of the two single clicks
const DOUBLE_CLICK_BONUS: i64 = 8;

pub const DECREMENT_ID: &str = "decrement";
pub const INCREMENT_ID: &str = "increment";
pub const RESET_ID: &str = "reset";
pub const COUNTER_ID: &str = "counter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Add(i64),
    Reset,
}

type Echo = Box<dyn FnMut(&str) + Send>;

pub struct Counter {
    count: i64,
    status: String,
    reset_pending: bool,
    echo: Option<Echo>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            count: 0,
            status: "ready".to_string(),
            reset_pending: false,
            echo: None,
        }
    }

    /// Report every change through `echo`; inline mode prints above the
    /// live region with it
    pub fn with_echo<F>(mut self, echo: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.echo = Some(Box::new(echo));
        self
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    fn add(&mut self, delta: i64) {
        self.count = self.count.saturating_add(delta);
        self.report(format!("count {:+} -> {}", delta, self.count));
    }

    fn report(&mut self, line: String) {
        debug!(count = self.count, "{line}");
        if let Some(echo) = self.echo.as_mut() {
            echo(&line);
        }
    }

    fn schedule_reset(&mut self) -> Command<Message> {
        if self.reset_pending {
            return Command::none();
        }
        self.reset_pending = true;
        self.status = "reset scheduled".to_string();
        Command::after(RESET_DELAY)
    }

    fn on_key(&mut self, event: &Event<Message>) -> Command<Message> {
        if event.is_quit_key() {
            return Command::quit();
        }
        if let Some(c) = event.as_char() {
            return match c {
                'q' => Command::quit(),
                '+' | '=' | 'k' => {
                    self.add(1);
                    Command::none()
                }
                '-' | 'j' => {
                    self.add(-1);
                    Command::none()
                }
                'r' => self.schedule_reset(),
                _ => Command::none(),
            };
        }
        match event.as_key().map(|key| key.code) {
            Some(KeyCode::Esc) => Command::quit(),
            Some(KeyCode::Up) => {
                self.add(1);
                Command::none()
            }
            Some(KeyCode::Down) => {
                self.add(-1);
                Command::none()
            }
            _ => Command::none(),
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Counter {
    type Message = Message;

    fn update(&mut self, event: Event<Message>) -> Command<Message> {
        match event {
            Event::Key(_) => self.on_key(&event),
            Event::Message(Message::Add(delta)) => {
                self.add(delta);
                Command::none()
            }
            Event::Message(Message::Reset) => self.schedule_reset(),
            Event::Tick(_) if self.reset_pending => {
                self.reset_pending = false;
                self.count = 0;
                self.status = "reset".to_string();
                self.report("count reset".to_string());
                Command::none()
            }
            Event::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::Move => {}
                    MouseEventKind::Scroll(ScrollDirection::Up) => self.add(1),
                    MouseEventKind::Scroll(ScrollDirection::Down) => self.add(-1),
                    kind => {
                        self.status = format!(
                            "{:?} at {},{}",
                            kind, mouse.position.x, mouse.position.y
                        );
                    }
                }
                Command::none()
            }
            Event::Paste(text) => {
                self.status = format!("pasted {} chars", text.chars().count());
                Command::none()
            }
            Event::InputError(err) => {
                self.report(format!("input closed: {err}"));
                Command::quit()
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame<'_, Message>) {
        let area = frame.area();
        let buttons = Stack::horizontal()
            .gap(1)
            .weight(0)
            .child(Text::new("[ - ]").style(Style::new().fg(Color::Red)))
            .child(Text::new("[ + ]").style(Style::new().fg(Color::Green)))
            .child(Spacer::new())
            .child(Text::new("[ reset ]").style(Style::new().reversed()));

        let count = Text::new(format!("count: {}", self.count)).style(Style::new().bold());
        let root = Stack::vertical()
            .child(Text::new("flexloop counter").style(Style::new().bold().fg(Color::Cyan)))
            .child(&count)
            .child(&buttons)
            .child(When::new(self.reset_pending, Text::new("resetting...")))
            .child(Text::new(self.status.as_str()).style(Style::new().fg(Color::DarkGrey)));

        let rows = root.arrange(area);
        frame.render(&root, area);

        if let Some(counter) = rows.get(1) {
            frame.register(
                MouseRegion::new(COUNTER_ID, *counter)
                    .on_message(Interaction::DoubleClick, Message::Reset),
            );
        }
        let Some(row) = rows.get(2).copied() else {
            return;
        };
        let cells = buttons.arrange(row);
        let targets: [(&str, usize, Message); 3] = [
            (DECREMENT_ID, 0, Message::Add(-1)),
            (INCREMENT_ID, 1, Message::Add(1)),
            (RESET_ID, 3, Message::Reset),
        ];
        for (id, index, message) in targets {
            let Some(cell) = cells.get(index).copied().filter(|r| !r.is_empty()) else {
                continue;
            };
            let mut region = MouseRegion::new(id, cell)
                .z_index(1)
                .on_message(Interaction::Click, message.clone());
            if let Message::Add(delta) = message {
                region = region
                    .on_message(Interaction::DoubleClick, Message::Add(delta * DOUBLE_CLICK_BONUS));
            }
            frame.register(region);
        }
    }
}

/// Rectangle a region was registered with in the most recent layout of `area`
pub fn region_area(app: &Counter, area: Rect, id: &str) -> Option<Rect> {
    let mut buffer = flexloop_tui::Buffer::new(area);
    let mut regions = flexloop_tui::RegionRegistry::new();
    let mut frame = Frame::new(area, 1, &mut buffer, &mut regions);
    app.view(&mut frame);
    regions.get(id).map(|region| region.area())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexloop_tui::event::{KeyEvent, KeyModifiers};
    use flexloop_tui::{Buffer, RegionRegistry};
    use std::sync::{Arc, Mutex};

    fn key(c: char) -> Event<Message> {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_keys_change_count() {
        let mut app = Counter::new();
        let _ = app.update(key('+'));
        let _ = app.update(key('+'));
        let _ = app.update(key('-'));
        assert_eq!(app.count(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = Counter::new();
        assert!(!app.update(key('q')).is_none());
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.update(ctrl_c).is_none());
        assert_eq!(app.count(), 0);
    }

    #[test]
    fn test_reset_waits_for_tick() {
        let mut app = Counter::new();
        let _ = app.update(Event::Message(Message::Add(5)));
        assert!(!app.update(key('r')).is_none());
        assert!(app.is_reset_pending());
        assert_eq!(app.count(), 5);

        // a second request while one is pending is ignored
        assert!(app.update(Event::Message(Message::Reset)).is_none());

        let _ = app.update(Event::Tick(std::time::Instant::now()));
        assert_eq!(app.count(), 0);
        assert!(!app.is_reset_pending());
    }

    #[test]
    fn test_buttons_follow_layout() {
        let app = Counter::new();
        let area = Rect::sized(30, 6);

        assert_eq!(region_area(&app, area, DECREMENT_ID), Some(Rect::new(0, 2, 5, 1)));
        assert_eq!(region_area(&app, area, INCREMENT_ID), Some(Rect::new(6, 2, 5, 1)));
        // the spacer pushes reset to the right edge
        assert_eq!(region_area(&app, area, RESET_ID), Some(Rect::new(21, 2, 9, 1)));
    }

    #[test]
    fn test_view_renders_count_and_status() {
        let mut app = Counter::new();
        let _ = app.update(Event::Message(Message::Add(3)));

        let area = Rect::sized(30, 6);
        let mut buffer = Buffer::new(area);
        let mut regions = RegionRegistry::new();
        let mut frame = Frame::new(area, 1, &mut buffer, &mut regions);
        app.view(&mut frame);

        assert_eq!(buffer.row_text(0).trim_end(), "flexloop counter");
        assert_eq!(buffer.row_text(1).trim_end(), "count: 3");
        assert_eq!(buffer.row_text(3).trim_end(), "ready");
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn test_echo_receives_changes() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let mut app = Counter::new().with_echo(move |line| sink.lock().unwrap().push(line.to_string()));

        let _ = app.update(Event::Message(Message::Add(2)));
        let _ = app.update(Event::Message(Message::Add(-1)));

        assert_eq!(*lines.lock().unwrap(), vec!["count +2 -> 2", "count -1 -> 1"]);
    }
}
