//! Input sources and the blocking reader that drains them into the queue

use std::io;
use std::sync::mpsc as std_mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TerminalEvent};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::shift_enter::ShiftEnter;
use super::Event;
use crate::runtime::queue::send_or_abandon;

/// Upper bound on one blocking poll so shutdown is noticed promptly
const IDLE_POLL: Duration = Duration::from_millis(50);

/// A blocking producer of decoded terminal events
pub trait InputSource: Send + 'static {
    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` means nothing arrived in time. End of input is reported as
    /// an [`io::ErrorKind::UnexpectedEof`] error.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<TerminalEvent>>;

    /// Whether this source already produces resize events
    fn reports_resize(&self) -> bool {
        false
    }
}

/// Reads the controlling terminal through crossterm
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<TerminalEvent>> {
        if event::poll(timeout)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    }

    fn reports_resize(&self) -> bool {
        true
    }
}

/// Events fed from another thread, for tests and scripted sessions
///
/// Dropping every sender ends the input stream.
pub struct ChannelInput {
    rx: std_mpsc::Receiver<TerminalEvent>,
}

impl ChannelInput {
    pub fn channel() -> (std_mpsc::Sender<TerminalEvent>, Self) {
        let (tx, rx) = std_mpsc::channel();
        (tx, Self { rx })
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<TerminalEvent>> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(std_mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(std_mpsc::RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input channel closed",
            )),
        }
    }
}

/// Start the reader on the blocking pool
pub(crate) fn spawn<I, M>(
    source: I,
    events: mpsc::Sender<Event<M>>,
    shutdown: watch::Receiver<bool>,
    shift_enter_timeout: Duration,
) -> JoinHandle<()>
where
    I: InputSource,
    M: Send + 'static,
{
    let handle = Handle::current();
    tokio::task::spawn_blocking(move || {
        read_input(source, events, shutdown, shift_enter_timeout, handle)
    })
}

fn read_input<I, M>(
    mut source: I,
    events: mpsc::Sender<Event<M>>,
    mut shutdown: watch::Receiver<bool>,
    shift_enter_timeout: Duration,
    handle: Handle,
) where
    I: InputSource,
    M: Send + 'static,
{
    debug!("input reader started");
    let mut shift_enter = ShiftEnter::new(shift_enter_timeout);

    let forward = |event: Event<M>, shutdown: &mut watch::Receiver<bool>| {
        handle.block_on(send_or_abandon(&events, event, shutdown))
    };

    loop {
        if *shutdown.borrow() {
            break;
        }

        let wait = shift_enter.wait(Instant::now(), IDLE_POLL);
        let polled = source.poll(wait);
        let now = Instant::now();

        let ready = match polled {
            Ok(Some(event)) => shift_enter.feed(event, now),
            Ok(None) => shift_enter.expire(now).into_iter().collect(),
            Err(err) => {
                if let Some(held) = shift_enter.flush() {
                    forward(Event::from_terminal(held, now), &mut shutdown);
                }
                if err.kind() == io::ErrorKind::UnexpectedEof {
                    debug!("input stream ended");
                } else {
                    warn!(error = %err, "input read failed");
                }
                forward(Event::InputError(err), &mut shutdown);
                break;
            }
        };

        for event in ready {
            if !forward(Event::from_terminal(event, now), &mut shutdown) {
                debug!("input reader abandoned send on shutdown");
                return;
            }
        }
    }

    debug!("input reader stopped");
}
