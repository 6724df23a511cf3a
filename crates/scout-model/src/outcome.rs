//! Payloads of the backend's request/response endpoints.

use serde::{Deserialize, Serialize};

use crate::opportunity::Opportunity;

/// Request body for a one-shot search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Response of a one-shot search: the whole pipeline state at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub result_markdown: String,
}

/// Response of the health probe.
///
/// The backend reports `ok` or an `env_error: ...` description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
