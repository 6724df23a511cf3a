use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the per-attempt progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLogEntry {
    /// Pipeline node (or client-side origin such as `parse`) that produced the entry.
    pub source_node: String,
    pub text: String,
    pub logged_at: DateTime<Utc>,
}

impl StepLogEntry {
    pub fn new(source_node: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_node: source_node.into(),
            text: text.into(),
            logged_at: Utc::now(),
        }
    }
}
