//! Result records produced by the search pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::identity::Identity;

/// Placeholder shown for a record without a title.
pub const UNTITLED: &str = "Untitled";

/// Placeholder shown for a record without a score.
pub const NO_SCORE: &str = "-";

/// A single result record.
///
/// Every field may be missing; the backend emits `null` or omits keys freely,
/// so each one deserializes leniently and anything of the wrong type is
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,
}

impl Opportunity {
    /// Build a record with a title and source, the two fields that define identity.
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            source: Some(source.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Stable identity derived from the normalized title and source.
    pub fn identity(&self) -> Identity {
        Identity::of(self)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    /// The source URI, if it is non-empty.
    pub fn link(&self) -> Option<&str> {
        self.source.as_deref().filter(|source| !source.is_empty())
    }

    /// Title for display, falling back to [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED,
        }
    }

    /// Score rounded half-up to an integer, or [`NO_SCORE`].
    ///
    /// Display only. Exports keep the exact value.
    pub fn display_score(&self) -> String {
        match self.score {
            Some(score) => format!("{}", (score + 0.5).floor()),
            None => NO_SCORE.to_string(),
        }
    }

    /// Exact score as text, empty when absent.
    pub fn score_text(&self) -> String {
        self.score.map(|score| score.to_string()).unwrap_or_default()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(value) => value.as_f64(),
        _ => None,
    })
}
