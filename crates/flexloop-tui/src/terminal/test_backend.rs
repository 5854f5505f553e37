//! In-memory backend for driving the runtime in tests

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Backend;
use crate::buffer::Buffer;
use crate::config::TerminalConfig;
use crate::geometry::Size;

#[derive(Debug)]
struct State {
    size: Size,
    frames: Vec<Buffer>,
    entered: usize,
    restored: usize,
    active: bool,
    invalidations: usize,
    fail_enter: bool,
    fail_draw: bool,
    features: Option<TerminalConfig>,
}

/// Records every frame instead of writing to a terminal
///
/// Clones share state, so a test keeps one clone to inspect after handing
/// the other to the runtime.
#[derive(Debug, Clone)]
pub struct TestBackend {
    state: Arc<Mutex<State>>,
}

impl TestBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                size: Size::new(width, height),
                frames: Vec::new(),
                entered: 0,
                restored: 0,
                active: false,
                invalidations: 0,
                fail_enter: false,
                fail_draw: false,
                features: None,
            })),
        }
    }

    /// Make `enter` fail with a broken-pipe error
    pub fn failing_enter(self) -> Self {
        self.state().fail_enter = true;
        self
    }

    /// Make every `draw` fail with a broken-pipe error
    pub fn failing_draw(self) -> Self {
        self.state().fail_draw = true;
        self
    }

    pub fn resize(&self, width: u16, height: u16) {
        self.state().size = Size::new(width, height);
    }

    pub fn draw_count(&self) -> usize {
        self.state().frames.len()
    }

    pub fn last_frame(&self) -> Option<Buffer> {
        self.state().frames.last().cloned()
    }

    pub fn frames(&self) -> Vec<Buffer> {
        self.state().frames.clone()
    }

    pub fn enter_count(&self) -> usize {
        self.state().entered
    }

    pub fn restore_count(&self) -> usize {
        self.state().restored
    }

    /// Entered and not yet restored
    pub fn is_active(&self) -> bool {
        self.state().active
    }

    pub fn invalidations(&self) -> usize {
        self.state().invalidations
    }

    pub fn features(&self) -> Option<TerminalConfig> {
        self.state().features.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for TestBackend {
    fn size(&self) -> io::Result<Size> {
        Ok(self.state().size)
    }

    fn enter(&mut self, features: &TerminalConfig) -> io::Result<()> {
        let mut state = self.state();
        if state.fail_enter {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "enter failed"));
        }
        state.entered += 1;
        state.active = true;
        state.features = Some(features.clone());
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        let mut state = self.state();
        state.restored += 1;
        state.active = false;
        Ok(())
    }

    fn draw(&mut self, buffer: &Buffer) -> io::Result<()> {
        let mut state = self.state();
        if state.fail_draw {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "draw failed"));
        }
        state.frames.push(buffer.clone());
        Ok(())
    }

    fn invalidate(&mut self) {
        self.state().invalidations += 1;
    }
}
