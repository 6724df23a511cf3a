//! Visible, selection-annotated view of a snapshot.
//!
//! Everything here is a pure function of the snapshot, the filter mode and
//! the selection store. Callers recompute the projection after any of the
//! three changes; nothing is cached.

use std::fmt;

use scout_model::{Identity, Opportunity};

use crate::selection::SelectionStore;
use crate::snapshot::Snapshot;

/// Which snapshot records are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Every record, in snapshot order.
    #[default]
    All,
    /// Only records whose identity has been saved.
    SavedOnly,
}

impl FilterMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::SavedOnly,
            Self::SavedOnly => Self::All,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::SavedOnly => "saved only",
        }
    }
}

/// One visible record with its derived flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow<'a> {
    pub opportunity: &'a Opportunity,
    pub identity: Identity,
    pub is_selected: bool,
    pub is_saved: bool,
}

/// Compute the visible rows for a snapshot.
pub fn project<'a>(
    snapshot: &'a Snapshot,
    filter: FilterMode,
    store: &SelectionStore,
) -> Vec<ProjectedRow<'a>> {
    snapshot
        .records()
        .iter()
        .filter_map(|opportunity| {
            let identity = opportunity.identity();
            let is_saved = store.is_saved(&identity);
            if filter == FilterMode::SavedOnly && !is_saved {
                return None;
            }
            Some(ProjectedRow {
                opportunity,
                is_selected: store.is_selected(&identity),
                is_saved,
                identity,
            })
        })
        .collect()
}

/// True when the snapshot is non-empty and every identity in it is selected.
///
/// Always evaluated against the full snapshot, regardless of the filter.
pub fn all_selected(snapshot: &Snapshot, store: &SelectionStore) -> bool {
    !snapshot.is_empty() && snapshot.identities().all(|id| store.is_selected(&id))
}

/// Select or deselect every identity of the full snapshot.
pub fn set_all_selected(snapshot: &Snapshot, store: &mut SelectionStore, selected: bool) {
    let identities: Vec<Identity> = snapshot.identities().collect();
    if selected {
        store.select_many(&identities);
    } else {
        store.deselect_many(&identities);
    }
}

/// Counter line shown under the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsSummary {
    Selected { selected: usize, total: usize },
    Results { total: usize },
}

impl ResultsSummary {
    pub fn of(snapshot: &Snapshot, store: &SelectionStore) -> Self {
        let total = snapshot.len();
        match store.selected_count() {
            0 => Self::Results { total },
            selected => Self::Selected { selected, total },
        }
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selected { selected, total } => write!(f, "{selected} selected of {total}"),
            Self::Results { total } => write!(f, "{total} results"),
        }
    }
}
