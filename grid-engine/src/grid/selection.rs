//! Key-based row selection
//!
//! Selection is tracked by [`RowKey`], never by row position or record
//! reference, so it survives filtering, sorting, paging and re-fetches of
//! the record collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::data::record::RowKey;

/// Selection policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Rows cannot be selected
    #[default]
    None,
    /// At most one row is selected
    Single,
    /// Any number of rows can be selected
    Multiple,
}

impl From<&str> for SelectionMode {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "single" => SelectionMode::Single,
            "multiple" | "multi" => SelectionMode::Multiple,
            "none" | "" => SelectionMode::None,
            other => {
                warn!(target: "config", "Unknown selection mode '{}', disabling selection", other);
                SelectionMode::None
            }
        }
    }
}

/// Tracks the selected row keys under a [`SelectionMode`]
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    mode: SelectionMode,
    selected: HashSet<RowKey>,
    /// Keys present in the latest record collection; None accepts any key
    known: Option<HashSet<RowKey>>,
}

impl SelectionController {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the policy. Switching to `Single` keeps at most one key
    /// (the smallest, for determinism); switching to `None` clears.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::None => self.selected.clear(),
            SelectionMode::Single if self.selected.len() > 1 => {
                let keep = self.selected.iter().min().cloned();
                self.selected.clear();
                self.selected.extend(keep);
            }
            _ => {}
        }
    }

    /// Replace the set of keys that may be selected
    pub fn set_known_keys<I: IntoIterator<Item = RowKey>>(&mut self, keys: I) {
        self.known = Some(keys.into_iter().collect());
    }

    pub fn is_known(&self, key: &RowKey) -> bool {
        self.known.as_ref().map_or(true, |known| known.contains(key))
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected keys, sorted for deterministic output
    pub fn selected_keys(&self) -> Vec<RowKey> {
        let mut keys: Vec<_> = self.selected.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Toggle a key. Returns true when the selection changed.
    ///
    /// Single mode replaces any previous selection; toggling the selected
    /// key again clears it. Unknown keys can be deselected but never added.
    pub fn toggle(&mut self, key: &RowKey) -> bool {
        if self.mode == SelectionMode::None {
            trace!(target: "selection", "Ignoring toggle of {} (selection disabled)", key);
            return false;
        }

        if self.selected.remove(key) {
            trace!(target: "selection", "Deselected {}", key);
            return true;
        }

        if !self.is_known(key) {
            trace!(target: "selection", "Ignoring toggle of unknown key {}", key);
            return false;
        }

        if self.mode == SelectionMode::Single {
            self.selected.clear();
        }
        self.selected.insert(key.clone());
        trace!(target: "selection", "Selected {} ({} total)", key, self.selected.len());
        true
    }

    /// Select every given key (multiple mode only). Keys outside `keys`
    /// keep their state. Returns true when the selection changed.
    pub fn select_all_visible(&mut self, keys: &[RowKey]) -> bool {
        if self.mode != SelectionMode::Multiple {
            return false;
        }
        let before = self.selected.len();
        for key in keys {
            if self.is_known(key) {
                self.selected.insert(key.clone());
            }
        }
        trace!(target: "selection", "Select all visible: {} -> {}", before, self.selected.len());
        self.selected.len() != before
    }

    /// Deselect every given key. Keys outside `keys` keep their state.
    /// Returns true when the selection changed.
    pub fn clear_all_visible(&mut self, keys: &[RowKey]) -> bool {
        let before = self.selected.len();
        for key in keys {
            self.selected.remove(key);
        }
        trace!(target: "selection", "Clear all visible: {} -> {}", before, self.selected.len());
        self.selected.len() != before
    }

    /// Whether every given key is selected (drives a header checkbox)
    pub fn all_selected(&self, keys: &[RowKey]) -> bool {
        !keys.is_empty() && keys.iter().all(|k| self.selected.contains(k))
    }

    /// Deselect everything. Returns true when the selection changed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }
}
