//! Row selection tracking by row key.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a row, independent of its position in any view.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(pub String);

impl RowKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(key: &str) -> Self {
        RowKey(key.to_string())
    }
}

impl From<String> for RowKey {
    fn from(key: String) -> Self {
        RowKey(key)
    }
}

impl From<i64> for RowKey {
    fn from(key: i64) -> Self {
        RowKey(key.to_string())
    }
}

/// How many rows can be selected at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one row (radio-button style).
    Single,
    /// Any number of rows (checkbox style).
    #[default]
    Multiple,
}

/// Selected row keys.
///
/// Under [`SelectionMode::Single`] the set never holds more than one key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    mode: SelectionMode,
    selected: BTreeSet<RowKey>,
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        Selection {
            mode,
            selected: BTreeSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switches mode. Going to single mode keeps at most the first key.
    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        self.mode = mode;
        if mode == SelectionMode::Single && self.selected.len() > 1 {
            let first = self.selected.iter().next().cloned();
            self.selected.clear();
            self.selected.extend(first);
            return true;
        }
        false
    }

    /// Flips one row. Returns the row's new state.
    ///
    /// In single mode, selecting a row deselects every other row.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        if self.selected.remove(&key) {
            return false;
        }
        if self.mode == SelectionMode::Single {
            self.selected.clear();
        }
        self.selected.insert(key);
        true
    }

    /// Selects or deselects one row. Returns `true` if the set changed.
    pub fn set(&mut self, key: RowKey, selected: bool) -> bool {
        if self.selected.contains(&key) == selected {
            return false;
        }
        self.toggle(key);
        true
    }

    /// Selects every given row. Single mode selects at most one.
    ///
    /// Returns `true` if the set changed.
    pub fn select_all<I: IntoIterator<Item = RowKey>>(&mut self, keys: I) -> bool {
        let before = self.selected.clone();
        match self.mode {
            SelectionMode::Single => {
                if let Some(first) = keys.into_iter().next() {
                    self.selected.clear();
                    self.selected.insert(first);
                }
            }
            SelectionMode::Multiple => self.selected.extend(keys),
        }
        self.selected != before
    }

    /// Deselects every row. Returns `true` if any were selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Keeps only the keys for which `keep` holds.
    pub fn retain<F: FnMut(&RowKey) -> bool>(&mut self, keep: F) -> bool {
        let before = self.selected.len();
        self.selected.retain(keep);
        self.selected.len() != before
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn keys(&self) -> &BTreeSet<RowKey> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
