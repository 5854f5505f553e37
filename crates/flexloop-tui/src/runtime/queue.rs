//! Bounded-queue sends that give up once shutdown is signalled

use tokio::sync::{mpsc, watch};

/// Send `value`, waiting for capacity unless shutdown arrives first.
///
/// Returns `false` when the value was dropped, either because shutdown was
/// signalled or the receiver is gone.
pub(crate) async fn send_or_abandon<T>(
    queue: &mpsc::Sender<T>,
    value: T,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    if *shutdown.borrow() {
        return false;
    }

    tokio::select! {
        biased;
        sent = queue.send(value) => sent.is_ok(),
        _ = stopped(shutdown) => false,
    }
}

/// Resolve once shutdown is signalled or its sender is gone
///
/// The value guard is dropped here, so the future's output borrows nothing.
pub(crate) async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
