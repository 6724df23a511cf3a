use std::fmt;

use serde::{Deserialize, Serialize};

use crate::opportunity::Opportunity;

/// Separator between the normalized title and source.
pub const IDENTITY_SEPARATOR: char = '|';

/// Deduplication key for an [`Opportunity`].
///
/// Derived from the trimmed, lowercased title and source, so a record keeps
/// its identity when its score or summary changes between snapshots. Records
/// with neither a title nor a source all share the same degenerate identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn of(opportunity: &Opportunity) -> Self {
        let title = normalize(opportunity.title());
        let source = normalize(opportunity.source());
        let mut key = String::with_capacity(title.len() + source.len() + 1);
        key.push_str(&title);
        key.push(IDENTITY_SEPARATOR);
        key.push_str(&source);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when both title and source were empty.
    pub fn is_degenerate(&self) -> bool {
        self.0.len() == IDENTITY_SEPARATOR.len_utf8()
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
