//! Commands: deferred work whose result comes back as an event
//!
//! An application never awaits anything itself. `update` returns a
//! [`Command`], the executor runs it off the event loop, and whatever it
//! produces is queued like any other input.

pub(crate) mod executor;

use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::warn;

use crate::event::Event;

/// A leaf unit of work; `None` means it finished without anything to report
pub(crate) type Task<M> = BoxFuture<'static, Option<Event<M>>>;

pub(crate) enum Kind<M> {
    None,
    Task(Task<M>),
    Batch(Vec<Command<M>>),
    Sequence(Vec<Command<M>>),
}

/// Work for the executor
///
/// A command runs at most once; dispatching it moves it to the executor.
#[must_use = "a command does nothing unless returned to the runtime"]
pub struct Command<M> {
    pub(crate) kind: Kind<M>,
}

impl<M: Send + 'static> Command<M> {
    pub fn none() -> Self {
        Self { kind: Kind::None }
    }

    /// Deliver `event` as soon as the executor picks the command up
    pub fn event(event: Event<M>) -> Self {
        Self::task(async move { Some(event) })
    }

    pub fn message(message: M) -> Self {
        Self::event(Event::Message(message))
    }

    pub fn quit() -> Self {
        Self::event(Event::Quit)
    }

    /// Run a future and deliver its output as a message
    pub fn perform<F>(future: F) -> Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        Self::task(future.map(|message| Some(Event::Message(message))))
    }

    /// Run a future that produces any event, including `Quit` or `Batch`
    pub fn perform_event<F>(future: F) -> Self
    where
        F: Future<Output = Event<M>> + Send + 'static,
    {
        Self::task(future.map(Some))
    }

    /// Run a blocking closure on the blocking pool
    ///
    /// A panicking closure produces no event.
    pub fn blocking<F>(work: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::task(async move {
            match tokio::task::spawn_blocking(work).await {
                Ok(message) => Some(Event::Message(message)),
                Err(err) => {
                    warn!(error = %err, "blocking command failed");
                    None
                }
            }
        })
    }

    /// Wait, then deliver a `Tick` stamped with the wake-up instant
    pub fn after(delay: Duration) -> Self {
        Self::task(async move {
            tokio::time::sleep(delay).await;
            Some(Event::Tick(Instant::now()))
        })
    }

    /// Wait, run `effect`, then deliver a `Tick`
    pub fn after_then<F>(delay: Duration, effect: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::task(async move {
            tokio::time::sleep(delay).await;
            effect();
            Some(Event::Tick(Instant::now()))
        })
    }

    /// Wait, then deliver the message built from the wake-up instant
    pub fn tick<F>(delay: Duration, to_message: F) -> Self
    where
        F: FnOnce(Instant) -> M + Send + 'static,
    {
        Self::task(async move {
            tokio::time::sleep(delay).await;
            Some(Event::Message(to_message(Instant::now())))
        })
    }

    /// Run every command concurrently; results arrive separately, in no
    /// particular order
    pub fn batch<I>(commands: I) -> Self
    where
        I: IntoIterator<Item = Command<M>>,
    {
        Self::combine(commands, Kind::Batch)
    }

    /// Run commands one after another; their results arrive together as one
    /// `Event::Batch`, in order
    pub fn sequence<I>(commands: I) -> Self
    where
        I: IntoIterator<Item = Command<M>>,
    {
        Self::combine(commands, Kind::Sequence)
    }

    fn combine<I>(commands: I, wrap: fn(Vec<Command<M>>) -> Kind<M>) -> Self
    where
        I: IntoIterator<Item = Command<M>>,
    {
        let commands: Vec<_> = commands.into_iter().filter(|c| !c.is_none()).collect();
        if commands.is_empty() {
            Self::none()
        } else {
            Self {
                kind: wrap(commands),
            }
        }
    }

    fn task<F>(future: F) -> Self
    where
        F: Future<Output = Option<Event<M>>> + Send + 'static,
    {
        Self {
            kind: Kind::Task(future.boxed()),
        }
    }
}

impl<M> Command<M> {
    pub fn is_none(&self) -> bool {
        matches!(self.kind, Kind::None)
    }

    /// Number of leaf tasks inside
    pub fn len(&self) -> usize {
        match &self.kind {
            Kind::None => 0,
            Kind::Task(_) => 1,
            Kind::Batch(commands) | Kind::Sequence(commands) => {
                commands.iter().map(Command::len).sum()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: Send + 'static> Default for Command<M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<M> std::fmt::Debug for Command<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            Kind::None => f.write_str("Command::None"),
            Kind::Task(_) => f.write_str("Command::Task"),
            Kind::Batch(commands) => f.debug_tuple("Command::Batch").field(commands).finish(),
            Kind::Sequence(commands) => f.debug_tuple("Command::Sequence").field(commands).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_drops_nones() {
        let cmd: Command<u8> = Command::batch([Command::none(), Command::message(1), Command::none()]);
        assert_eq!(cmd.len(), 1);
        assert!(!cmd.is_none());

        let empty: Command<u8> = Command::batch([Command::none(), Command::none()]);
        assert!(empty.is_none());
    }

    #[test]
    fn test_nested_len() {
        let cmd: Command<u8> = Command::sequence([
            Command::message(1),
            Command::batch([Command::message(2), Command::quit()]),
        ]);
        assert_eq!(cmd.len(), 3);
    }

    #[test]
    fn test_default_is_none() {
        let cmd: Command<()> = Command::default();
        assert!(cmd.is_none());
        assert!(cmd.is_empty());
    }
}
