//! The event type consumed by the application

use std::io;
use std::time::Instant;

use crossterm::event::{Event as TerminalEvent, KeyCode, KeyEvent, KeyModifiers};

use super::MouseEvent;

/// Everything the event loop can hand to an application
///
/// `M` is the application's own message type; async work reports back through
/// [`Event::Message`].
#[derive(Debug)]
pub enum Event<M> {
    /// Keyboard input
    Key(KeyEvent),
    /// Raw or synthesized mouse input
    Mouse(MouseEvent),
    /// Bracketed paste
    Paste(String),
    /// Terminal resized
    Resize { width: u16, height: u16 },
    /// Timer fired
    Tick(Instant),
    FocusGained,
    FocusLost,
    /// Result of a command
    Message(M),
    /// Several events delivered in order; `Quit` inside stops the rest
    Batch(Vec<Event<M>>),
    /// The input stream failed or ended; no more input will arrive
    InputError(io::Error),
    /// Stop the event loop
    Quit,
}

impl<M> Event<M> {
    /// Convert a decoded terminal event, stamping mouse input with `at`
    pub fn from_terminal(event: TerminalEvent, at: Instant) -> Self {
        match event {
            TerminalEvent::Key(key) => Event::Key(key),
            TerminalEvent::Mouse(mouse) => Event::Mouse(MouseEvent::from_terminal(mouse, at)),
            TerminalEvent::Resize(width, height) => Event::Resize { width, height },
            TerminalEvent::FocusGained => Event::FocusGained,
            TerminalEvent::FocusLost => Event::FocusLost,
            TerminalEvent::Paste(text) => Event::Paste(text),
        }
    }

    /// Ctrl+C or Ctrl+Q
    pub fn is_quit_key(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c') | KeyCode::Char('q'),
                modifiers,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL)
        )
    }

    pub fn is_enter(&self) -> bool {
        matches!(self, Event::Key(KeyEvent { code: KeyCode::Enter, .. }))
    }

    pub fn is_shift_enter(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent { code: KeyCode::Enter, modifiers, .. })
                if modifiers.contains(KeyModifiers::SHIFT)
        )
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Event::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            Event::Mouse(mouse) => Some(mouse),
            _ => None,
        }
    }

    /// Plain character typed without Ctrl or Alt
    pub fn as_char(&self) -> Option<char> {
        match self {
            Event::Key(KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                ..
            }) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => Some(*c),
            _ => None,
        }
    }

    pub fn into_message(self) -> Option<M> {
        match self {
            Event::Message(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseEventKind;
    use crossterm::event::{MouseButton, MouseEvent as TerminalMouse, MouseEventKind as TerminalMouseKind};

    type Ev = Event<()>;

    #[test]
    fn test_is_quit_key() {
        let ctrl_c: Ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(ctrl_c.is_quit_key());

        let just_q: Ev = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!just_q.is_quit_key());
    }

    #[test]
    fn test_shift_enter_is_still_enter() {
        let ev: Ev = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        assert!(ev.is_enter());
        assert!(ev.is_shift_enter());

        let plain: Ev = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(!plain.is_shift_enter());
    }

    #[test]
    fn test_as_char_ignores_control_chords() {
        let a: Ev = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(a.as_char(), Some('a'));

        let alt_a: Ev = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT));
        assert_eq!(alt_a.as_char(), None);
    }

    #[test]
    fn test_from_terminal_mouse_keeps_timestamp() {
        let at = Instant::now();
        let raw = TerminalEvent::Mouse(TerminalMouse {
            kind: TerminalMouseKind::Down(MouseButton::Left),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });

        let ev: Ev = Event::from_terminal(raw, at);
        let mouse = ev.as_mouse().copied().unwrap();
        assert_eq!(mouse.kind, MouseEventKind::Press);
        assert_eq!(mouse.at, at);
        assert_eq!((mouse.position.x, mouse.position.y), (4, 2));
    }

    #[test]
    fn test_resize_conversion() {
        let ev: Ev = Event::from_terminal(TerminalEvent::Resize(100, 30), Instant::now());
        assert!(matches!(ev, Event::Resize { width: 100, height: 30 }));
    }
}
