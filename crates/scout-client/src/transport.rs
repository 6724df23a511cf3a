//! One WebSocket connection per query attempt.
//!
//! Each connection runs on its own task and forwards what it observes as
//! [`Tagged`] events, stamped with the attempt that opened it, over a shared
//! channel. The owner of the session decides what to do with them; the
//! connection task never touches session state.

use futures_util::StreamExt;
use scout_core::{AttemptId, TransportEvent};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

/// A transport event stamped with its originating attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged {
    pub attempt: AttemptId,
    pub event: TransportEvent,
}

/// Handle to a running connection task.
///
/// Dropping the handle asks the task to close its socket.
#[derive(Debug)]
pub struct AttemptConnection {
    attempt: AttemptId,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AttemptConnection {
    /// Open `url` on a new task, forwarding events to `events`.
    pub fn spawn(attempt: AttemptId, url: Url, events: mpsc::Sender<Tagged>) -> Self {
        let (stop, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run_connection(attempt, url, events, stop_rx));
        Self {
            attempt,
            stop,
            task,
        }
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Ask the task to close the socket. Idempotent.
    pub fn close(&self) {
        let _ = self.stop.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AttemptConnection {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_connection(
    attempt: AttemptId,
    url: Url,
    events: mpsc::Sender<Tagged>,
    mut stop: watch::Receiver<bool>,
) {
    let forward = |event: TransportEvent| {
        let events = events.clone();
        async move {
            if events.send(Tagged { attempt, event }).await.is_err() {
                debug!(%attempt, "session dropped; discarding transport event");
            }
        }
    };

    debug!(%attempt, %url, "opening stream");
    let connect = tokio::select! {
        result = connect_async(url.as_str()) => result,
        _ = stop.changed() => {
            debug!(%attempt, "attempt closed before connecting");
            return;
        }
    };
    let mut socket = match connect {
        Ok((socket, _response)) => socket,
        Err(err) => {
            warn!(%attempt, error = %err, "stream connection failed");
            forward(TransportEvent::Error(err.to_string())).await;
            return;
        }
    };

    loop {
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    debug!(%attempt, "closing stream");
                    let _ = socket.close(None).await;
                    break;
                }
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    forward(TransportEvent::Message(text.as_str().to_owned())).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    forward(TransportEvent::Closed).await;
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(%attempt, error = %err, "stream read failed");
                    forward(TransportEvent::Error(err.to_string())).await;
                    break;
                }
            }
        }
    }
}
