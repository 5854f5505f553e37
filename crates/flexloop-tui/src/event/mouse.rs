//! Mouse events, raw and synthesized

use std::time::Instant;

use crossterm::event::{
    KeyModifiers, MouseButton, MouseEvent as TerminalMouse, MouseEventKind as TerminalMouseKind,
};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// What happened to the pointer
///
/// `Press`, `Release`, `Move` and `Scroll` come from the terminal. Everything
/// else is synthesized by the gesture handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Press,
    Release,
    Move,
    Scroll(ScrollDirection),
    Click,
    DoubleClick,
    TripleClick,
    DragStart,
    Drag,
    DragEnd,
    DragCancel,
    Enter,
    Leave,
}

impl MouseEventKind {
    pub fn is_raw(self) -> bool {
        matches!(
            self,
            MouseEventKind::Press
                | MouseEventKind::Release
                | MouseEventKind::Move
                | MouseEventKind::Scroll(_)
        )
    }

    pub fn interaction(self) -> Interaction {
        match self {
            MouseEventKind::Press => Interaction::Press,
            MouseEventKind::Release => Interaction::Release,
            MouseEventKind::Move => Interaction::Move,
            MouseEventKind::Scroll(_) => Interaction::Scroll,
            MouseEventKind::Click => Interaction::Click,
            MouseEventKind::DoubleClick => Interaction::DoubleClick,
            MouseEventKind::TripleClick => Interaction::TripleClick,
            MouseEventKind::DragStart => Interaction::DragStart,
            MouseEventKind::Drag => Interaction::Drag,
            MouseEventKind::DragEnd => Interaction::DragEnd,
            MouseEventKind::DragCancel => Interaction::DragCancel,
            MouseEventKind::Enter => Interaction::Enter,
            MouseEventKind::Leave => Interaction::Leave,
        }
    }
}

/// Key under which a region registers a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Press,
    Release,
    Move,
    Scroll,
    Click,
    DoubleClick,
    TripleClick,
    DragStart,
    Drag,
    DragEnd,
    DragCancel,
    Enter,
    Leave,
}

/// A pointer event stamped with the instant it was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Button involved, if the terminal reported one
    pub button: Option<MouseButton>,
    pub position: Point,
    pub modifiers: KeyModifiers,
    pub at: Instant,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, position: Point, at: Instant) -> Self {
        Self {
            kind,
            button: None,
            position,
            modifiers: KeyModifiers::NONE,
            at,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Same pointer state, different kind
    pub fn synthesize(&self, kind: MouseEventKind) -> Self {
        Self { kind, ..*self }
    }

    pub fn from_terminal(event: TerminalMouse, at: Instant) -> Self {
        let (kind, button) = match event.kind {
            TerminalMouseKind::Down(button) => (MouseEventKind::Press, Some(button)),
            TerminalMouseKind::Up(button) => (MouseEventKind::Release, Some(button)),
            // Terminals report motion with a held button as a drag; the gesture
            // handler decides whether it really is one.
            TerminalMouseKind::Drag(button) => (MouseEventKind::Move, Some(button)),
            TerminalMouseKind::Moved => (MouseEventKind::Move, None),
            TerminalMouseKind::ScrollUp => (MouseEventKind::Scroll(ScrollDirection::Up), None),
            TerminalMouseKind::ScrollDown => (MouseEventKind::Scroll(ScrollDirection::Down), None),
            TerminalMouseKind::ScrollLeft => (MouseEventKind::Scroll(ScrollDirection::Left), None),
            TerminalMouseKind::ScrollRight => {
                (MouseEventKind::Scroll(ScrollDirection::Right), None)
            }
        };

        Self {
            kind,
            button,
            position: Point::new(event.column, event.row),
            modifiers: event.modifiers,
            at,
        }
    }
}
