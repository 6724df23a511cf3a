//! Drives a [`SearchSession`] from live connections.

use scout_core::{AttemptId, Effect, Handled, SearchSession};
use tokio::sync::mpsc;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::transport::{AttemptConnection, Tagged};

const EVENT_BUFFER: usize = 64;

/// Owns the session and the connection of its current attempt.
///
/// All session mutation happens on the task that owns the controller, one
/// event at a time. Connection tasks only forward tagged events.
#[derive(Debug)]
pub struct StreamController {
    endpoint: Endpoint,
    session: SearchSession,
    events_tx: mpsc::Sender<Tagged>,
    events_rx: mpsc::Receiver<Tagged>,
    connection: Option<AttemptConnection>,
}

impl StreamController {
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_session(endpoint, SearchSession::new())
    }

    pub fn with_session(endpoint: Endpoint, session: SearchSession) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            endpoint,
            session,
            events_tx,
            events_rx,
            connection: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SearchSession {
        &mut self.session
    }

    /// Submit a query and open its connection.
    ///
    /// The previous attempt's connection is asked to close; anything it
    /// already queued is discarded by the session as stale.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty query or an unusable endpoint. The
    /// session is unchanged in either case.
    pub fn submit(&mut self, query: &str) -> Result<AttemptId> {
        let url = self.endpoint.stream_url(query.trim())?;
        let attempt = self.session.submit(query)?;
        self.connection = Some(AttemptConnection::spawn(
            attempt,
            url,
            self.events_tx.clone(),
        ));
        Ok(attempt)
    }

    /// Wait for the next transport event and apply it.
    ///
    /// Cancel-safe: if the future is dropped before an event arrives, no
    /// event is lost.
    pub async fn next(&mut self) -> Handled {
        let Some(Tagged { attempt, event }) = self.events_rx.recv().await else {
            // The controller holds a sender, so the channel never closes.
            return Handled::Ignored;
        };
        let handled = self.session.handle(attempt, event);
        if handled.effects().contains(&Effect::CloseConnection) {
            self.close_connection(attempt);
        }
        handled
    }

    /// Apply events until the loading flag clears, passing each effect to
    /// `on_effect`. Returns immediately when nothing is loading.
    pub async fn run_until_settled(&mut self, mut on_effect: impl FnMut(&Effect)) {
        while self.session.is_loading() {
            let handled = self.next().await;
            for effect in handled.effects() {
                on_effect(effect);
            }
        }
    }

    fn close_connection(&mut self, attempt: AttemptId) {
        if let Some(connection) = self
            .connection
            .take_if(|connection| connection.attempt() == attempt)
        {
            debug!(%attempt, "closing connection after terminal message");
            connection.close();
        }
    }
}
