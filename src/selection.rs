use serde::{Deserialize, Serialize};

/// The persisted and transmitted unit of selection state.
///
/// `count` must equal `picks.len()` whenever a `Selection` is observed;
/// anything that violates this came from a corrupt slot or a bad server
/// response and is discarded by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub count: u32,
    #[serde(default)]
    pub picks: Vec<String>,
}

impl Selection {
    pub fn is_consistent(&self) -> bool {
        if self.count as usize != self.picks.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.picks.iter().all(|p| seen.insert(p))
    }
}

/// In-memory selection set for the current session. Single source of truth
/// for "is this item picked"; owns no I/O.
///
/// Insertion order is preserved so that toggling an id twice returns the
/// selection to its prior value.
#[derive(Debug, Default)]
pub struct SelectionStore {
    picks: Vec<String>,
}

impl SelectionStore {
    /// Builds a store from a restored selection, dropping duplicates.
    pub fn from_selection(selection: Selection) -> Self {
        let mut store = Self::default();
        store.replace(selection);
        store
    }

    /// Flips membership of `id`. Returns true when the item ends up picked.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.picks.iter().position(|p| p == id) {
            self.picks.remove(pos);
            false
        } else {
            self.picks.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.picks.iter().any(|p| p == id)
    }

    /// Wholesale overwrite, used when restoring from the server or the jar.
    pub fn replace(&mut self, selection: Selection) {
        let mut seen = std::collections::HashSet::new();
        self.picks = selection
            .picks
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
    }

    pub fn count(&self) -> usize {
        self.picks.len()
    }

    /// Read-only copy for persistence and transmission.
    pub fn snapshot(&self) -> Selection {
        Selection {
            count: self.picks.len() as u32,
            picks: self.picks.clone(),
        }
    }
}
