//! Selected and saved identities.
//!
//! Both sets are keyed by [`Identity`], never by row position, so a record's
//! checked and saved status carries over whenever a new snapshot contains a
//! record with the same identity.

use std::collections::BTreeSet;

use scout_model::Identity;

/// The two identity sets that outlive individual snapshots.
///
/// The selection belongs to one query attempt and is cleared when a new one
/// starts. The saved set lives as long as the store.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: BTreeSet<Identity>,
    saved: BTreeSet<Identity>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, identity: &Identity) -> bool {
        self.selected.contains(identity)
    }

    pub fn is_saved(&self, identity: &Identity) -> bool {
        self.saved.contains(identity)
    }

    /// Set or clear the selection flag for one identity.
    pub fn set_selected(&mut self, identity: Identity, selected: bool) {
        if selected {
            self.selected.insert(identity);
        } else {
            self.selected.remove(&identity);
        }
    }

    /// Flip the selection flag; returns the new state.
    pub fn toggle(&mut self, identity: Identity) -> bool {
        if self.selected.remove(&identity) {
            false
        } else {
            self.selected.insert(identity);
            true
        }
    }

    pub fn select_many<'a>(&mut self, identities: impl IntoIterator<Item = &'a Identity>) {
        self.selected.extend(identities.into_iter().cloned());
    }

    pub fn deselect_many<'a>(&mut self, identities: impl IntoIterator<Item = &'a Identity>) {
        for identity in identities {
            self.selected.remove(identity);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Copy every selected identity into the saved set.
    ///
    /// Returns the number of selected identities, whether or not they were
    /// already saved.
    pub fn save_selected(&mut self) -> usize {
        self.saved.extend(self.selected.iter().cloned());
        self.selected.len()
    }

    pub fn selected(&self) -> impl Iterator<Item = &Identity> {
        self.selected.iter()
    }

    pub fn saved(&self) -> impl Iterator<Item = &Identity> {
        self.saved.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_model::Opportunity;

    fn id(title: &str) -> Identity {
        Opportunity::new(title, "http://example.com").identity()
    }

    #[test]
    fn toggle_flips_membership() {
        let mut store = SelectionStore::new();
        assert!(store.toggle(id("a")));
        assert!(store.is_selected(&id("a")));
        assert!(!store.toggle(id("a")));
        assert!(!store.is_selected(&id("a")));
    }

    #[test]
    fn save_selected_is_idempotent() {
        let mut store = SelectionStore::new();
        store.select_many([&id("a"), &id("b")]);

        assert_eq!(store.save_selected(), 2);
        let once: Vec<Identity> = store.saved().cloned().collect();
        assert_eq!(store.save_selected(), 2);
        let twice: Vec<Identity> = store.saved().cloned().collect();

        assert_eq!(once, twice);
        assert_eq!(store.saved_count(), 2);
        assert_eq!(store.selected_count(), 2);
    }

    #[test]
    fn clearing_selection_keeps_saved() {
        let mut store = SelectionStore::new();
        store.set_selected(id("a"), true);
        store.save_selected();
        store.clear_selection();
        assert!(!store.has_selection());
        assert!(store.is_saved(&id("a")));
    }
}
