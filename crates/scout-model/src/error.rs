use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed {kind} message: {reason}")]
    Malformed { kind: &'static str, reason: String },
    #[error("message is not a json object")]
    NotAnObject,
}

impl ModelError {
    pub(crate) fn malformed(kind: &'static str, source: &serde_json::Error) -> Self {
        Self::Malformed {
            kind,
            reason: source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
