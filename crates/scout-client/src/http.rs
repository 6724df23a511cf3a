//! Request/response calls to the search backend.

use reqwest::header::{HeaderValue, USER_AGENT};
use scout_model::{HealthStatus, SearchOutcome, SearchRequest};
use tracing::{debug, info};

use crate::endpoint::Endpoint;
use crate::error::Result;

const USER_AGENT_VALUE: &str = concat!("opportunity-scout/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the one-shot search and the health probe.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl SearchClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Run a whole search in one request and return the final pipeline state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a search outcome.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let url = self.endpoint.search_url()?;
        info!(%url, "running one-shot search");
        let outcome = self
            .http
            .post(url)
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .json(&SearchRequest {
                query: query.trim().to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json::<SearchOutcome>()
            .await?;
        debug!(
            steps = outcome.steps.len(),
            results = outcome.opportunities.len(),
            "one-shot search finished"
        );
        Ok(outcome)
    }

    /// Query the backend health probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with a
    /// non-success status.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint.health_url()?;
        debug!(%url, "probing backend health");
        let status = self
            .http
            .get(url)
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .send()
            .await?
            .error_for_status()?
            .json::<HealthStatus>()
            .await?;
        Ok(status)
    }
}
