use scout_model::{Identity, Opportunity};

/// The full result set as of the most recent update.
///
/// Replaced wholesale on every update, never merged field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<Opportunity>,
}

impl Snapshot {
    pub fn new(records: Vec<Opportunity>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Opportunity] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identities of every record, in snapshot order (duplicates included).
    pub fn identities(&self) -> impl Iterator<Item = Identity> + '_ {
        self.records.iter().map(Opportunity::identity)
    }

    /// First record carrying the given identity.
    pub fn find(&self, identity: &Identity) -> Option<&Opportunity> {
        self.records.iter().find(|op| &op.identity() == identity)
    }
}

impl From<Vec<Opportunity>> for Snapshot {
    fn from(records: Vec<Opportunity>) -> Self {
        Self::new(records)
    }
}
