//! The resize listener worker
//!
//! Terminals signal size changes with `SIGWINCH`. Input sources that decode
//! resize events themselves make this worker unnecessary.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::event::Event;

#[cfg(unix)]
pub(crate) fn spawn<M: Send + 'static>(
    events: mpsc::Sender<Event<M>>,
    mut shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};
    use tracing::{debug, warn};

    use super::queue::{send_or_abandon, stopped};

    let mut winch = match signal(SignalKind::window_change()) {
        Ok(winch) => winch,
        Err(err) => {
            warn!(error = %err, "cannot listen for SIGWINCH");
            return None;
        }
    };

    Some(tokio::spawn(async move {
        debug!("resize listener started");
        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                received = winch.recv() => {
                    if received.is_none() {
                        break;
                    }
                    let (width, height) = match crossterm::terminal::size() {
                        Ok(size) => size,
                        Err(err) => {
                            debug!(error = %err, "terminal size unavailable after SIGWINCH");
                            continue;
                        }
                    };
                    if !send_or_abandon(&events, Event::Resize { width, height }, &mut shutdown).await {
                        break;
                    }
                }
            }
        }
        debug!("resize listener stopped");
    }))
}

#[cfg(not(unix))]
pub(crate) fn spawn<M: Send + 'static>(
    _events: mpsc::Sender<Event<M>>,
    _shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    None
}
