//! Data model for opportunity search: result records, their identity, the
//! progress log and the messages a search stream carries.

pub mod error;
pub mod identity;
pub mod message;
pub mod opportunity;
pub mod outcome;
pub mod step_log;

pub use error::{ModelError, Result};
pub use identity::{IDENTITY_SEPARATOR, Identity};
pub use message::{FinalState, ServerMessage, StepState};
pub use opportunity::{NO_SCORE, Opportunity, UNTITLED};
pub use outcome::{HealthStatus, SearchOutcome, SearchRequest};
pub use step_log::StepLogEntry;
