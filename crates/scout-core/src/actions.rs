//! Bulk actions over the current selection.

use std::fmt;

use tracing::debug;

use crate::selection::SelectionStore;
use crate::snapshot::Snapshot;

/// Opens a source in a new browsing context.
///
/// `dispatch` schedules one navigation and returns immediately. Navigations
/// carry no ordering guarantee relative to each other, and a failed or
/// blocked navigation never affects the others.
pub trait Navigator {
    fn dispatch(&self, target: &str);
}

/// Feedback line reported after a toolbar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFeedback {
    /// A bulk action ran with nothing selected.
    NoSelections,
    Opened(usize),
    Saved(usize),
    Exported(usize),
}

impl fmt::Display for ActionFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSelections => f.write_str("No selections."),
            Self::Opened(count) => write!(f, "{count} opportunities opened."),
            Self::Saved(count) => write!(f, "{count} opportunities saved."),
            Self::Exported(count) => write!(f, "{count} opportunities exported."),
        }
    }
}

/// Dispatch a navigation for every selected record that has a source.
///
/// Selected identities absent from the snapshot, and records without a
/// source, are skipped and not counted. The selection is left untouched.
pub fn open_selected(
    snapshot: &Snapshot,
    store: &SelectionStore,
    navigator: &dyn Navigator,
) -> ActionFeedback {
    if !store.has_selection() {
        return ActionFeedback::NoSelections;
    }
    let mut opened = 0;
    for identity in store.selected() {
        let Some(target) = snapshot.find(identity).and_then(|op| op.link()) else {
            debug!(%identity, "selected opportunity has no source to open");
            continue;
        };
        navigator.dispatch(target);
        opened += 1;
    }
    ActionFeedback::Opened(opened)
}

/// Add every selected identity to the saved set.
pub fn save_selected(store: &mut SelectionStore) -> ActionFeedback {
    if !store.has_selection() {
        return ActionFeedback::NoSelections;
    }
    ActionFeedback::Saved(store.save_selected())
}
