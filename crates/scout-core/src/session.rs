//! Protocol state machine and the session that owns all search state.
//!
//! A [`SearchSession`] is owned by exactly one stream-handling component. It
//! holds the current [`Attempt`], the selection store and the filter mode, and
//! exposes the projection and toolbar actions over them. Transport adapters
//! feed it [`TransportEvent`]s tagged with the [`AttemptId`] they belong to;
//! events from any attempt other than the current one are discarded.

use std::fmt;

use scout_model::{FinalState, Identity, ServerMessage, StepLogEntry, StepState};
use tracing::{debug, info, warn};

use crate::actions::{self, ActionFeedback, Navigator};
use crate::error::{CoreError, Result};
use crate::export;
use crate::projection::{self, FilterMode, ProjectedRow, ResultsSummary};
use crate::selection::SelectionStore;
use crate::snapshot::Snapshot;

/// Step log text used when a `step` message carries no progress lines.
pub const STEP_PLACEHOLDER: &str = "Updated";
/// Step log text used when an `error` message carries no text.
pub const UNKNOWN_ERROR: &str = "Unknown error";
/// Step log text for a frame that could not be decoded.
pub const PARSE_FAILURE: &str = "Failed to parse message";
/// Step log text appended on terminal success.
pub const COMPLETED: &str = "Completed";

/// Identifies one submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing submitted yet.
    Idle,
    /// Connection requested, no acknowledgement yet.
    Connecting,
    /// Acknowledged and streaming progress.
    Active,
    /// Finished, failed or disconnected. Absorbing.
    Terminated,
}

/// How a terminated attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A `final` message arrived.
    Completed,
    /// The server sent an `error` message.
    Failed(String),
    /// The transport reported an error.
    TransportFailed(String),
    /// The connection closed before any terminal message.
    Disconnected,
}

/// What the transport observed on an attempt's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One text frame.
    Message(String),
    /// The connection failed.
    Error(String),
    /// The connection closed.
    Closed,
}

/// Observable consequence of handling one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Logged(StepLogEntry),
    SnapshotReplaced { len: usize },
    Loading(bool),
    /// The attempt's connection should be closed by the transport.
    CloseConnection,
}

/// Result of feeding one event to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    Applied(Vec<Effect>),
    /// Unknown message kind, or the attempt no longer accepts events.
    Ignored,
    /// The event belongs to a superseded attempt.
    Stale,
}

impl Handled {
    pub fn effects(&self) -> &[Effect] {
        match self {
            Self::Applied(effects) => effects,
            Self::Ignored | Self::Stale => &[],
        }
    }
}

/// Per-attempt state: the machine instance for one submitted query.
#[derive(Debug, Clone)]
pub struct Attempt {
    id: AttemptId,
    query: String,
    state: StreamState,
    loading: bool,
    log: Vec<StepLogEntry>,
    snapshot: Snapshot,
    result_markdown: Option<String>,
    outcome: Option<AttemptOutcome>,
}

impl Attempt {
    fn idle() -> Self {
        Self {
            id: AttemptId(0),
            query: String::new(),
            state: StreamState::Idle,
            loading: false,
            log: Vec::new(),
            snapshot: Snapshot::default(),
            result_markdown: None,
            outcome: None,
        }
    }

    fn start(id: AttemptId, query: String) -> Self {
        Self {
            id,
            query,
            state: StreamState::Connecting,
            loading: true,
            ..Self::idle()
        }
    }

    pub fn id(&self) -> AttemptId {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn log(&self) -> &[StepLogEntry] {
        &self.log
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn result_markdown(&self) -> Option<&str> {
        self.result_markdown.as_deref()
    }

    pub fn outcome(&self) -> Option<&AttemptOutcome> {
        self.outcome.as_ref()
    }

    fn accepts_events(&self) -> bool {
        matches!(self.state, StreamState::Connecting | StreamState::Active)
    }

    fn handle(&mut self, event: TransportEvent) -> Handled {
        if !self.accepts_events() {
            debug!(attempt = %self.id, state = ?self.state, "event after attempt ended");
            return Handled::Ignored;
        }
        let mut effects = Vec::new();
        match event {
            TransportEvent::Message(text) => match ServerMessage::parse(&text) {
                Ok(ServerMessage::Unknown { kind }) => {
                    debug!(attempt = %self.id, kind = kind.as_deref(), "ignoring unknown message kind");
                    return Handled::Ignored;
                }
                Ok(message) => self.apply(message, &mut effects),
                Err(error) => {
                    warn!(attempt = %self.id, %error, "failed to parse stream message");
                    self.append("parse", PARSE_FAILURE, &mut effects);
                    self.set_loading(false, &mut effects);
                }
            },
            TransportEvent::Error(detail) => {
                warn!(attempt = %self.id, %detail, "stream transport error");
                self.append("socket", format!("WebSocket error: {detail}"), &mut effects);
                self.terminate(AttemptOutcome::TransportFailed(detail), &mut effects);
            }
            TransportEvent::Closed => {
                info!(attempt = %self.id, "stream closed before a terminal message");
                self.terminate(AttemptOutcome::Disconnected, &mut effects);
            }
        }
        Handled::Applied(effects)
    }

    fn apply(&mut self, message: ServerMessage, effects: &mut Vec<Effect>) {
        debug!(attempt = %self.id, kind = message.kind(), state = ?self.state, "stream message");
        match message {
            ServerMessage::Ack { query } => {
                self.state = StreamState::Active;
                self.append("init", format!("Started: {query}"), effects);
            }
            ServerMessage::Step { node, state } => {
                self.state = StreamState::Active;
                self.apply_step(node, state, effects);
            }
            ServerMessage::Final { state } => self.apply_final(state, effects),
            ServerMessage::Error { message } => {
                let text = message
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                self.append("error", text.clone(), effects);
                self.terminate(AttemptOutcome::Failed(text), effects);
            }
            ServerMessage::Unknown { .. } => {}
        }
    }

    fn apply_step(&mut self, node: String, state: StepState, effects: &mut Vec<Effect>) {
        let text = state
            .last_step()
            .filter(|text| !text.is_empty())
            .unwrap_or(STEP_PLACEHOLDER)
            .to_string();
        self.append(node, text, effects);
        if let Some(records) = state.opportunities {
            self.replace_snapshot(Snapshot::new(records), effects);
        }
    }

    fn apply_final(&mut self, state: FinalState, effects: &mut Vec<Effect>) {
        if let Some(records) = state.opportunities {
            self.replace_snapshot(Snapshot::new(records), effects);
        }
        if state.result_markdown.is_some() {
            self.result_markdown = state.result_markdown;
        }
        self.append("done", COMPLETED, effects);
        self.terminate(AttemptOutcome::Completed, effects);
        effects.push(Effect::CloseConnection);
        info!(attempt = %self.id, results = self.snapshot.len(), "search completed");
    }

    fn replace_snapshot(&mut self, snapshot: Snapshot, effects: &mut Vec<Effect>) {
        let len = snapshot.len();
        self.snapshot = snapshot;
        effects.push(Effect::SnapshotReplaced { len });
    }

    fn append(
        &mut self,
        node: impl Into<String>,
        text: impl Into<String>,
        effects: &mut Vec<Effect>,
    ) {
        let entry = StepLogEntry::new(node, text);
        self.log.push(entry.clone());
        effects.push(Effect::Logged(entry));
    }

    fn set_loading(&mut self, loading: bool, effects: &mut Vec<Effect>) {
        if self.loading != loading {
            self.loading = loading;
            effects.push(Effect::Loading(loading));
        }
    }

    fn terminate(&mut self, outcome: AttemptOutcome, effects: &mut Vec<Effect>) {
        self.state = StreamState::Terminated;
        self.outcome = Some(outcome);
        self.set_loading(false, effects);
    }
}

/// All state of one search surface: the current attempt, the selection
/// store and the filter mode.
#[derive(Debug, Clone)]
pub struct SearchSession {
    attempt: Attempt,
    last_id: u64,
    store: SelectionStore,
    filter: FilterMode,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            attempt: Attempt::idle(),
            last_id: 0,
            store: SelectionStore::new(),
            filter: FilterMode::default(),
        }
    }

    /// Start a new attempt for `query`, superseding any current one.
    ///
    /// Clears the step log, the snapshot and the selection, and turns the
    /// loading flag on. Saved identities and the filter mode are kept. The
    /// caller opens the connection for the returned attempt.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyQuery`] when the trimmed query is empty; the
    /// session is left unchanged.
    pub fn submit(&mut self, query: &str) -> Result<AttemptId> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::EmptyQuery);
        }
        self.last_id += 1;
        let id = AttemptId(self.last_id);
        if self.attempt.accepts_events() {
            info!(previous = %self.attempt.id, attempt = %id, "superseding in-flight attempt");
        }
        self.attempt = Attempt::start(id, query.to_string());
        self.store.clear_selection();
        info!(attempt = %id, query, "query submitted");
        Ok(id)
    }

    /// Feed one transport event observed on `attempt`'s connection.
    pub fn handle(&mut self, attempt: AttemptId, event: TransportEvent) -> Handled {
        if attempt != self.attempt.id {
            debug!(
                stale = %attempt,
                current = %self.attempt.id,
                "discarding event from superseded attempt"
            );
            return Handled::Stale;
        }
        self.attempt.handle(event)
    }

    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    pub fn state(&self) -> StreamState {
        self.attempt.state
    }

    pub fn is_loading(&self) -> bool {
        self.attempt.loading
    }

    pub fn log(&self) -> &[StepLogEntry] {
        &self.attempt.log
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.attempt.snapshot
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    /// Visible rows under the current filter.
    pub fn rows(&self) -> Vec<ProjectedRow<'_>> {
        projection::project(&self.attempt.snapshot, self.filter, &self.store)
    }

    pub fn summary(&self) -> ResultsSummary {
        ResultsSummary::of(&self.attempt.snapshot, &self.store)
    }

    pub fn all_selected(&self) -> bool {
        projection::all_selected(&self.attempt.snapshot, &self.store)
    }

    /// Select or deselect every record of the full snapshot.
    pub fn set_all_selected(&mut self, selected: bool) {
        projection::set_all_selected(&self.attempt.snapshot, &mut self.store, selected);
    }

    pub fn set_selected(&mut self, identity: Identity, selected: bool) {
        self.store.set_selected(identity, selected);
    }

    /// Drop every selected identity, including ones no longer in the snapshot.
    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    /// Toggle the selection of the visible row at `index`.
    ///
    /// Returns the row's new selection state, or `None` when no such row is
    /// visible.
    pub fn toggle_row(&mut self, index: usize) -> Option<bool> {
        let identity = self.rows().get(index)?.identity.clone();
        Some(self.store.toggle(identity))
    }

    pub fn open_selected(&self, navigator: &dyn Navigator) -> ActionFeedback {
        actions::open_selected(&self.attempt.snapshot, &self.store, navigator)
    }

    pub fn save_selected(&mut self) -> ActionFeedback {
        actions::save_selected(&mut self.store)
    }

    /// Export the visible rows as CSV.
    pub fn export_csv(&self) -> Result<String> {
        export::export_csv(&self.rows())
    }
}
