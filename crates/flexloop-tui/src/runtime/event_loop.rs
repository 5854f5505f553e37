//! The event-loop worker
//!
//! The only place application code runs. The first frame is drawn before
//! any event is taken. After that each wake-up handles one event, drains
//! whatever else is already queued, and marks the frame dirty; the frame
//! ticker then renders once.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use super::queue::{send_or_abandon, stopped};
use crate::app::{App, Frame};
use crate::buffer::Buffer;
use crate::command::Command;
use crate::error::RuntimeError;
use crate::event::Event;
use crate::geometry::Rect;
use crate::mouse::{MouseHandler, RegionRegistry};
use crate::terminal::Backend;

enum Flow {
    Continue,
    Quit,
}

pub(crate) struct EventLoop<'r, A: App, B> {
    app: &'r mut A,
    backend: &'r mut B,
    commands: mpsc::Sender<Command<A::Message>>,
    shutdown: watch::Receiver<bool>,
    frames: &'r AtomicU64,
    frame_interval: Duration,
    gestures: Option<MouseHandler>,
    regions: RegionRegistry<A::Message>,
    buffer: Buffer,
    dirty: bool,
}

impl<'r, A: App, B: Backend> EventLoop<'r, A, B> {
    pub(crate) fn new(
        app: &'r mut A,
        backend: &'r mut B,
        commands: mpsc::Sender<Command<A::Message>>,
        shutdown: watch::Receiver<bool>,
        frames: &'r AtomicU64,
        frame_interval: Duration,
        gestures: Option<MouseHandler>,
    ) -> Self {
        Self {
            app,
            backend,
            commands,
            shutdown,
            frames,
            frame_interval,
            gestures,
            regions: RegionRegistry::new(),
            buffer: Buffer::new(Rect::empty()),
            dirty: true,
        }
    }

    /// Run until `Quit`, shutdown, a closed queue, or a render failure
    pub(crate) async fn run(
        &mut self,
        events: &mut mpsc::Receiver<Event<A::Message>>,
        init: Command<A::Message>,
    ) -> Result<(), RuntimeError> {
        self.submit(init).await;
        // Regions only exist once a frame has been drawn; input already
        // queued must hit-test against them.
        self.render()?;

        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut self.shutdown) => {
                    debug!("event loop observed shutdown");
                    return Ok(());
                }
                _ = ticker.tick(), if self.dirty => {
                    self.render()?;
                }
                received = events.recv() => {
                    let Some(event) = received else {
                        debug!("event queue closed");
                        return Ok(());
                    };
                    if let Flow::Quit = self.process(event).await {
                        return Ok(());
                    }
                    // Everything already queued joins this frame
                    while let Ok(event) = events.try_recv() {
                        if let Flow::Quit = self.process(event).await {
                            return Ok(());
                        }
                    }
                    self.dirty = true;
                }
            }
        }
    }

    async fn process(&mut self, event: Event<A::Message>) -> Flow {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            match event {
                Event::Quit => {
                    debug!(skipped = pending.len(), "quit received");
                    return Flow::Quit;
                }
                Event::Batch(events) => {
                    for event in events.into_iter().rev() {
                        pending.push_front(event);
                    }
                }
                Event::Mouse(mouse) if mouse.kind.is_raw() => {
                    let synthesized = match self.gestures.as_mut() {
                        Some(gestures) => gestures.handle(&mouse, &self.regions),
                        None => vec![Event::Mouse(mouse)],
                    };
                    for event in synthesized {
                        self.deliver(event).await;
                    }
                }
                event @ (Event::Resize { .. } | Event::FocusLost) => {
                    if let Event::Resize { width, height } = &event {
                        trace!(width, height, "terminal resized");
                        self.backend.invalidate();
                    }
                    self.cancel_gestures().await;
                    self.deliver(event).await;
                }
                event => self.deliver(event).await,
            }
        }

        Flow::Continue
    }

    async fn cancel_gestures(&mut self) {
        let cancelled = match self.gestures.as_mut() {
            Some(gestures) => gestures.cancel(Instant::now(), &self.regions),
            None => return,
        };
        for event in cancelled {
            self.deliver(event).await;
        }
    }

    async fn deliver(&mut self, event: Event<A::Message>) {
        let command = self.app.update(event);
        self.submit(command).await;
    }

    async fn submit(&mut self, command: Command<A::Message>) {
        if command.is_none() {
            return;
        }
        if !send_or_abandon(&self.commands, command, &mut self.shutdown).await {
            trace!("command dropped on shutdown");
        }
    }

    fn render(&mut self) -> Result<(), RuntimeError> {
        let size = self.backend.size().map_err(RuntimeError::Render)?;
        let area = Rect::sized(size.width, size.height);
        if self.buffer.area() == area {
            self.buffer.reset();
        } else {
            self.buffer.resize(area);
        }

        self.regions.clear();
        let index = self.frames.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut frame = Frame::new(area, index, &mut self.buffer, &mut self.regions);
            self.app.view(&mut frame);
        }

        self.backend.draw(&self.buffer).map_err(RuntimeError::Render)?;
        self.dirty = false;
        trace!(frame = index, regions = self.regions.len(), "frame rendered");
        Ok(())
    }
}
