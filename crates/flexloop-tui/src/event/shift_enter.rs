//! Backslash-then-Enter detection
//!
//! Many terminals cannot report Shift+Enter. Users type `\` followed by Enter
//! instead, so a backslash is held back briefly: if Enter follows in time the
//! pair becomes a single Shift+Enter, otherwise the backslash is released as
//! typed.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub(crate) struct ShiftEnter {
    timeout: Duration,
    pending: Option<(KeyEvent, Instant)>,
}

impl ShiftEnter {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            pending: None,
        }
    }

    /// Feed one decoded event, getting back whatever is ready to forward
    pub(crate) fn feed(&mut self, event: Event, now: Instant) -> Vec<Event> {
        let pending = self.pending.take();
        match (pending, event) {
            (None, Event::Key(key)) if is_backslash(&key) => {
                self.pending = Some((key, now));
                Vec::new()
            }
            (None, event) => vec![event],
            (Some((_, since)), Event::Key(key))
                if is_enter(&key) && now.saturating_duration_since(since) <= self.timeout =>
            {
                vec![Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT))]
            }
            (Some((held, _)), Event::Key(key)) if is_backslash(&key) => {
                self.pending = Some((key, now));
                vec![Event::Key(held)]
            }
            (Some((held, _)), event) => vec![Event::Key(held), event],
        }
    }

    /// Release a held backslash whose window has closed
    pub(crate) fn expire(&mut self, now: Instant) -> Option<Event> {
        match self.pending {
            Some((_, since)) if now.saturating_duration_since(since) > self.timeout => {
                self.pending.take().map(|(held, _)| Event::Key(held))
            }
            _ => None,
        }
    }

    /// Release a held backslash regardless of timing
    pub(crate) fn flush(&mut self) -> Option<Event> {
        self.pending.take().map(|(held, _)| Event::Key(held))
    }

    /// How long the reader may block before a held backslash needs attention
    pub(crate) fn wait(&self, now: Instant, idle: Duration) -> Duration {
        match self.pending {
            Some((_, since)) => {
                let deadline = since + self.timeout;
                deadline
                    .saturating_duration_since(now)
                    .max(Duration::from_millis(1))
                    .min(idle)
            }
            None => idle,
        }
    }
}

fn is_backslash(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.code == KeyCode::Char('\\')
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn is_enter(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press && key.code == KeyCode::Enter
}
