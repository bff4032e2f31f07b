use std::future::Future;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Drives `fut` to completion unless a shutdown signal is pending or arrives
/// first, in which case `fut` is dropped and `None` returned.
///
/// A pending signal always wins over a ready future. A closed channel never
/// cancels.
pub async fn or_shutdown<F: Future>(
    fut: F,
    shutdown: &mut broadcast::Receiver<()>,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = signalled(shutdown) => None,
        out = fut => Some(out),
    }
}

async fn signalled(shutdown: &mut broadcast::Receiver<()>) {
    match shutdown.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        // no sender left, nothing can ever be signalled
        Err(RecvError::Closed) => std::future::pending::<()>().await,
    }
}

/// Consumes a pending shutdown signal without waiting.
pub fn shutdown_pending(shutdown: &mut broadcast::Receiver<()>) -> bool {
    matches!(shutdown.try_recv(), Ok(()) | Err(TryRecvError::Lagged(_)))
}
