//! Gesture synthesis from raw pointer input
//!
//! The handler turns press / move / release into clicks, multi-clicks, drags
//! and hover transitions, dispatching each one to the region it concerns. Its
//! output is an ordered list of events: synthesized gestures come before the
//! raw event that caused them, and a region handler's message follows the
//! mouse event it answered.

use std::time::Instant;

use crossterm::event::MouseButton;
use tracing::trace;

use super::{RegionId, RegionRegistry};
use crate::config::GestureConfig;
use crate::event::{Event, MouseEvent, MouseEventKind};
use crate::geometry::Point;

/// Press held until release
#[derive(Debug, Clone)]
struct Capture {
    region: Option<RegionId>,
    button: Option<MouseButton>,
    origin: Point,
    dragging: bool,
}

#[derive(Debug, Clone)]
struct LastClick {
    region: Option<RegionId>,
    button: Option<MouseButton>,
    at: Instant,
    count: u8,
}

#[derive(Debug)]
pub struct MouseHandler {
    config: GestureConfig,
    capture: Option<Capture>,
    hovered: Option<RegionId>,
    last_click: Option<LastClick>,
    last_position: Point,
}

impl MouseHandler {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            capture: None,
            hovered: None,
            last_click: None,
            last_position: Point::default(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.capture.as_ref().is_some_and(|c| c.dragging)
    }

    pub fn is_captured(&self) -> bool {
        self.capture.is_some()
    }

    pub fn hovered(&self) -> Option<&RegionId> {
        self.hovered.as_ref()
    }

    /// Process one raw mouse event
    ///
    /// The returned events include `event` itself. Already synthesized events
    /// pass through untouched.
    pub fn handle<M>(&mut self, event: &MouseEvent, regions: &RegionRegistry<M>) -> Vec<Event<M>> {
        let mut out = Vec::new();
        self.last_position = event.position;

        match event.kind {
            MouseEventKind::Press => self.on_press(event, regions, &mut out),
            MouseEventKind::Move => self.on_move(event, regions, &mut out),
            MouseEventKind::Release => self.on_release(event, regions, &mut out),
            MouseEventKind::Scroll(_) => {
                let target = regions.hit_test(event.position).map(|r| r.id().clone());
                emit(&mut out, regions, target.as_ref(), *event);
            }
            _ => out.push(Event::Mouse(*event)),
        }

        out
    }

    /// Abandon any gesture in progress
    ///
    /// Used when the pointer can no longer be trusted, e.g. after a resize or
    /// focus loss. An active drag ends with a drag-cancel.
    pub fn cancel<M>(&mut self, at: Instant, regions: &RegionRegistry<M>) -> Vec<Event<M>> {
        let mut out = Vec::new();
        if let Some(capture) = self.capture.take() {
            if capture.dragging {
                trace!(region = ?capture.region, "drag cancelled");
                let mut event = MouseEvent::new(MouseEventKind::DragCancel, self.last_position, at);
                event.button = capture.button;
                emit(&mut out, regions, capture.region.as_ref(), event);
            }
        }
        self.last_click = None;
        out
    }

    fn on_press<M>(&mut self, event: &MouseEvent, regions: &RegionRegistry<M>, out: &mut Vec<Event<M>>) {
        let hit = regions.hit_test(event.position).map(|r| r.id().clone());

        if self.capture.is_none() {
            self.capture = Some(Capture {
                region: hit.clone(),
                button: event.button,
                origin: event.position,
                dragging: false,
            });
        }

        emit(out, regions, hit.as_ref(), *event);
    }

    fn on_move<M>(&mut self, event: &MouseEvent, regions: &RegionRegistry<M>, out: &mut Vec<Event<M>>) {
        self.update_hover(event, regions, out);

        let drag_threshold = self.config.drag_threshold;
        if let Some(capture) = self.capture.as_mut() {
            if capture.dragging {
                emit(out, regions, capture.region.as_ref(), drag_event(event, capture, MouseEventKind::Drag));
            } else if capture.origin.distance(event.position) > drag_threshold {
                capture.dragging = true;
                trace!(region = ?capture.region, "drag started");
                emit(out, regions, capture.region.as_ref(), drag_event(event, capture, MouseEventKind::DragStart));
            }
        }

        let hovered = self.hovered.clone();
        emit(out, regions, hovered.as_ref(), *event);
    }

    fn on_release<M>(&mut self, event: &MouseEvent, regions: &RegionRegistry<M>, out: &mut Vec<Event<M>>) {
        let Some(capture) = self.capture.take() else {
            let hit = regions.hit_test(event.position).map(|r| r.id().clone());
            emit(out, regions, hit.as_ref(), *event);
            return;
        };

        if capture.dragging {
            emit(out, regions, capture.region.as_ref(), drag_event(event, &capture, MouseEventKind::DragEnd));
        }

        if capture.origin.distance(event.position) <= self.config.click_move_threshold {
            self.synthesize_clicks(event, &capture, regions, out);
        }

        emit(out, regions, capture.region.as_ref(), *event);
    }

    fn synthesize_clicks<M>(
        &mut self,
        event: &MouseEvent,
        capture: &Capture,
        regions: &RegionRegistry<M>,
        out: &mut Vec<Event<M>>,
    ) {
        let interval = self.config.multi_click_interval();
        let count = match &self.last_click {
            Some(last)
                if last.region == capture.region
                    && last.button == capture.button
                    && event.at.saturating_duration_since(last.at) < interval =>
            {
                last.count + 1
            }
            _ => 1,
        };

        let mut click = event.synthesize(MouseEventKind::Click);
        click.button = capture.button;
        emit(out, regions, capture.region.as_ref(), click);

        match count {
            2 => emit(out, regions, capture.region.as_ref(), click.synthesize(MouseEventKind::DoubleClick)),
            3 => emit(out, regions, capture.region.as_ref(), click.synthesize(MouseEventKind::TripleClick)),
            _ => {}
        }

        // A triple click ends the streak
        self.last_click = (count < 3).then(|| LastClick {
            region: capture.region.clone(),
            button: capture.button,
            at: event.at,
            count,
        });
    }

    fn update_hover<M>(&mut self, event: &MouseEvent, regions: &RegionRegistry<M>, out: &mut Vec<Event<M>>) {
        let under = regions.hit_test(event.position).map(|r| r.id().clone());
        if under == self.hovered {
            return;
        }

        if let Some(previous) = self.hovered.take() {
            emit(out, regions, Some(&previous), event.synthesize(MouseEventKind::Leave));
        }
        if let Some(next) = &under {
            emit(out, regions, Some(next), event.synthesize(MouseEventKind::Enter));
        }
        self.hovered = under;
    }
}

impl Default for MouseHandler {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

fn drag_event(event: &MouseEvent, capture: &Capture, kind: MouseEventKind) -> MouseEvent {
    let mut drag = event.synthesize(kind);
    drag.button = capture.button;
    drag
}

/// Queue `event`, followed by the target region's answer to it
fn emit<M>(out: &mut Vec<Event<M>>, regions: &RegionRegistry<M>, target: Option<&RegionId>, event: MouseEvent) {
    out.push(Event::Mouse(event));
    if let Some(message) = target.and_then(|id| regions.dispatch(id, &event)) {
        out.push(Event::Message(message));
    }
}
