//! The application runtime
//!
//! A [`Runtime`] coordinates four workers that only talk through queues:
//!
//! - the event loop, the single consumer of the event queue and the only
//!   worker that runs application code
//! - the input reader, which blocks on the input source
//! - the command executor, which runs commands as independent tasks
//! - the resize listener, on Unix when the input source does not report
//!   resizes itself

mod event_loop;
pub(crate) mod queue;
mod resize;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use self::event_loop::EventLoop;
use crate::app::App;
use crate::command::{executor, Command};
use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::event::{reader, Event, InputSource};
use crate::mouse::MouseHandler;
use crate::terminal::Backend;

type Queues<M> = (mpsc::Receiver<Event<M>>, mpsc::Receiver<Command<M>>);

/// Event-driven application runtime
///
/// The queues outlive individual runs, so handles taken before `run` keep
/// working and a runtime can be run again after it returns.
pub struct Runtime<M> {
    config: RuntimeConfig,
    events: mpsc::Sender<Event<M>>,
    commands: mpsc::Sender<Command<M>>,
    queues: Mutex<Option<Queues<M>>>,
    shutdown: Arc<Shutdown>,
    frames: AtomicU64,
    running: AtomicBool,
}

impl<M: Send + 'static> Runtime<M> {
    pub fn new(config: RuntimeConfig) -> Self {
        let (events, events_rx) = mpsc::channel(config.event_capacity.max(1));
        let (commands, commands_rx) = mpsc::channel(config.command_capacity.max(1));
        Self {
            config,
            events,
            commands,
            queues: Mutex::new(Some((events_rx, commands_rx))),
            shutdown: Arc::new(Shutdown::new()),
            frames: AtomicU64::new(0),
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn handle(&self) -> RuntimeHandle<M> {
        RuntimeHandle {
            events: self.events.clone(),
            commands: self.commands.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run `app` until it quits, the input ends, or shutdown is requested
    ///
    /// The init hook runs before the terminal is touched. Once the terminal has
    /// been entered it is restored on every way out, after which the teardown
    /// hook runs. The application is handed back at the end.
    pub async fn run<A, B, I>(&self, mut app: A, mut backend: B, input: I) -> Result<A, RuntimeError>
    where
        A: App<Message = M>,
        B: Backend,
        I: InputSource,
    {
        let _running = RunningFlag::raise(&self.running)?;
        let (mut events, commands) = self.take_queues()?;
        let stop = self.shutdown.rearm();

        let init = match app.init() {
            Ok(command) => command,
            Err(err) => {
                self.return_queues(events, commands);
                return Err(RuntimeError::Init(err));
            }
        };

        if let Err(err) = backend.enter(&self.config.terminal) {
            let _ = backend.restore();
            self.return_queues(events, commands);
            return Err(RuntimeError::Terminal(err));
        }
        info!(
            mode = self.config.terminal.mode.as_str(),
            fps = self.config.fps,
            "runtime started"
        );

        let reports_resize = input.reports_resize();
        let executor = executor::spawn(commands, self.events.clone(), stop.clone());
        // The reader may be parked in a blocking read; it notices shutdown on
        // its next poll and is not awaited.
        let _reader = reader::spawn(
            input,
            self.events.clone(),
            stop.clone(),
            self.config.shift_enter_timeout(),
        );
        let resize = if reports_resize {
            None
        } else {
            resize::spawn(self.events.clone(), stop.clone())
        };

        let gestures = self
            .config
            .gestures
            .enabled
            .then(|| MouseHandler::new(self.config.gestures.clone()));
        let outcome = EventLoop::new(
            &mut app,
            &mut backend,
            self.commands.clone(),
            stop,
            &self.frames,
            self.config.frame_interval(),
            gestures,
        )
        .run(&mut events, init)
        .await;

        self.shutdown.trigger();
        let restored = backend.restore();
        app.teardown();

        if let Some(resize) = resize {
            resize.abort();
        }
        let commands = match executor.await {
            Ok(commands) => commands,
            Err(err) => {
                warn!(error = %err, "command executor failed");
                return Err(RuntimeError::WorkerPanicked(err.to_string()));
            }
        };
        while events.try_recv().is_ok() {}
        self.return_queues(events, commands);

        info!(frames = self.frames(), "runtime stopped");
        outcome?;
        restored.map_err(RuntimeError::Terminal)?;
        Ok(app)
    }

    fn take_queues(&self) -> Result<Queues<M>, RuntimeError> {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(RuntimeError::QueueClosed)
    }

    fn return_queues(&self, events: mpsc::Receiver<Event<M>>, commands: mpsc::Receiver<Command<M>>) {
        *self.queues.lock().unwrap_or_else(PoisonError::into_inner) = Some((events, commands));
    }
}

impl<M: Send + 'static> Default for Runtime<M> {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

/// Shutdown signal of the current run
///
/// Each run gets a fresh channel. The previous one is left signalled, so a
/// worker that outlives its run (a reader parked in a blocking poll) can only
/// ever observe shutdown.
struct Shutdown {
    current: Mutex<watch::Sender<bool>>,
}

impl Shutdown {
    fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            current: Mutex::new(sender),
        }
    }

    /// Signal the current channel and install a fresh one
    fn rearm(&self) -> watch::Receiver<bool> {
        let (sender, receiver) = watch::channel(false);
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.send_replace(true);
        *current = sender;
        receiver
    }

    fn trigger(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send_replace(true);
    }

    fn is_triggered(&self) -> bool {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner).borrow()
    }
}

/// Clears the running flag when a run ends, however it ends
struct RunningFlag<'a>(&'a AtomicBool);

impl<'a> RunningFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Result<Self, RuntimeError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| RuntimeError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Cloneable way into a runtime from other tasks and threads
pub struct RuntimeHandle<M> {
    events: mpsc::Sender<Event<M>>,
    commands: mpsc::Sender<Command<M>>,
    shutdown: Arc<Shutdown>,
}

impl<M> Clone for RuntimeHandle<M> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            commands: self.commands.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<M: Send + 'static> RuntimeHandle<M> {
    /// Queue an event, waiting for room
    pub async fn send(&self, event: Event<M>) -> Result<(), RuntimeError> {
        self.events
            .send(event)
            .await
            .map_err(|_| RuntimeError::QueueClosed)
    }

    /// Queue an event without waiting
    pub fn try_send(&self, event: Event<M>) -> Result<(), RuntimeError> {
        self.events.try_send(event).map_err(|err| match err {
            TrySendError::Full(_) => RuntimeError::QueueFull,
            TrySendError::Closed(_) => RuntimeError::QueueClosed,
        })
    }

    pub async fn message(&self, message: M) -> Result<(), RuntimeError> {
        self.send(Event::Message(message)).await
    }

    /// Hand a command to the executor
    pub async fn dispatch(&self, command: Command<M>) -> Result<(), RuntimeError> {
        if command.is_none() {
            return Ok(());
        }
        self.commands
            .send(command)
            .await
            .map_err(|_| RuntimeError::QueueClosed)
    }

    /// Ask the loop to quit once it reaches this event
    pub async fn quit(&self) -> Result<(), RuntimeError> {
        self.send(Event::Quit).await
    }

    /// Stop every worker at its next suspension point, skipping queued events
    pub fn shutdown(&self) {
        debug!("shutdown requested");
        self.shutdown.trigger();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }
}
