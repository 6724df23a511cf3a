//! Error types for the search transport.

use thiserror::Error;

/// Errors raised while talking to the search backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The configured server URL cannot address the backend.
    #[error("invalid server url {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// An HTTP request failed or returned a non-success status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Core(#[from] scout_core::CoreError),

    /// Browser launching needs a running tokio runtime.
    #[error("no async runtime available to dispatch navigations")]
    NoRuntime,
}

impl ClientError {
    pub(crate) fn endpoint(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
