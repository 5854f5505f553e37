//! The command executor worker
//!
//! Pulls commands off the command queue and spawns one task per command, so a
//! slow command never holds up the ones behind it. Results go back through the
//! event queue.

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, trace, warn};

use super::{Command, Kind};
use crate::event::Event;
use crate::runtime::queue::{send_or_abandon, stopped};

/// Start the executor; it hands the command receiver back when it stops
pub(crate) fn spawn<M: Send + 'static>(
    commands: mpsc::Receiver<Command<M>>,
    events: mpsc::Sender<Event<M>>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<mpsc::Receiver<Command<M>>> {
    tokio::spawn(execute(commands, events, shutdown))
}

async fn execute<M: Send + 'static>(
    mut commands: mpsc::Receiver<Command<M>>,
    events: mpsc::Sender<Event<M>>,
    mut shutdown: watch::Receiver<bool>,
) -> mpsc::Receiver<Command<M>> {
    debug!("command executor started");
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = stopped(&mut shutdown) => break,
            received = commands.recv() => match received {
                Some(command) => schedule(command, &mut tasks, &events, &shutdown),
                None => break,
            },
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(err) = joined {
                    if err.is_panic() {
                        warn!(error = %err, "command task panicked");
                    }
                }
            }
        }
    }

    // Unfinished work is dropped with the runtime
    let pending = tasks.len();
    tasks.shutdown().await;
    debug!(pending, "command executor stopped");
    commands
}

fn schedule<M: Send + 'static>(
    command: Command<M>,
    tasks: &mut JoinSet<()>,
    events: &mpsc::Sender<Event<M>>,
    shutdown: &watch::Receiver<bool>,
) {
    match command.kind {
        Kind::None => {}
        Kind::Batch(commands) => {
            for command in commands {
                schedule(command, tasks, events, shutdown);
            }
        }
        kind => {
            let events = events.clone();
            let mut shutdown = shutdown.clone();
            tasks.spawn(async move {
                if let Some(event) = evaluate(Command { kind }).await {
                    if !send_or_abandon(&events, event, &mut shutdown).await {
                        trace!("command result dropped on shutdown");
                    }
                }
            });
        }
    }
}

/// Run a command to completion inside the current task
fn evaluate<M: Send + 'static>(command: Command<M>) -> BoxFuture<'static, Option<Event<M>>> {
    async move {
        match command.kind {
            Kind::None => None,
            Kind::Task(task) => task.await,
            Kind::Sequence(commands) => {
                let mut results = Vec::with_capacity(commands.len());
                for command in commands {
                    if let Some(event) = evaluate(command).await {
                        results.push(event);
                    }
                }
                Some(Event::Batch(results))
            }
            Kind::Batch(commands) => {
                let results = join_all(commands.into_iter().map(evaluate)).await;
                Some(Event::Batch(results.into_iter().flatten().collect()))
            }
        }
    }
    .boxed()
}
