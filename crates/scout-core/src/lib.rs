//! Stream reconciliation engine.
//!
//! Interprets the inbound messages of one search attempt, keeps the latest
//! result snapshot, and maintains selection, saved and filter state keyed by
//! record identity so it survives any number of snapshot replacements. The
//! engine has no rendering or transport dependencies; adapters drive it
//! through [`SearchSession`].

pub mod actions;
pub mod error;
pub mod export;
pub mod projection;
pub mod selection;
pub mod session;
pub mod snapshot;

pub use actions::{ActionFeedback, Navigator};
pub use error::{CoreError, Result};
pub use export::{CSV_HEADER, EXPORT_FILE_NAME, export_csv};
pub use projection::{FilterMode, ProjectedRow, ResultsSummary, project};
pub use selection::SelectionStore;
pub use session::{
    Attempt, AttemptId, AttemptOutcome, Effect, Handled, SearchSession, StreamState,
    TransportEvent,
};
pub use snapshot::Snapshot;
