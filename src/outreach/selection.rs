// src/outreach/selection.rs
//! Row Selection Store: the loaded rows plus the set of selected `row_index`
//! values. Kept free of any Bevy or egui types so it can be tested on its own.

use std::collections::BTreeSet;
use thiserror::Error;

use super::definitions::Row;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selected row {0} is not part of the loaded rows")]
    StaleIndex(i64),
}

/// Invariant: every member of `selected` is the `row_index` of a row in `rows`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSelection {
    rows: Vec<Row>,
    selected: BTreeSet<i64>,
}

impl RowSelection {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            selected: BTreeSet::new(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn contains_row(&self, row_index: i64) -> bool {
        self.rows.iter().any(|r| r.row_index == row_index)
    }

    /// Flips membership of `row_index`. Indices that aren't loaded are ignored.
    /// Returns whether the row is selected afterwards.
    pub fn toggle(&mut self, row_index: i64) -> bool {
        if !self.contains_row(row_index) {
            return false;
        }
        if self.selected.remove(&row_index) {
            false
        } else {
            self.selected.insert(row_index);
            true
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.rows.iter().map(|r| r.row_index).collect();
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Header checkbox behavior: select everything unless everything is
    /// already selected, in which case clear.
    pub fn toggle_all(&mut self) {
        if self.all_selected() {
            self.clear_all();
        } else {
            self.select_all();
        }
    }

    /// Swaps in a fresh row list. The selection is always cleared, even when
    /// the new list reuses indices that were selected before.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.selected.clear();
    }

    pub fn is_selected(&self, row_index: i64) -> bool {
        self.selected.contains(&row_index)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn all_selected(&self) -> bool {
        !self.rows.is_empty() && self.selected.len() == self.rows.len()
    }

    pub fn selected_indices(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }

    /// Materializes the selected rows in row-list order (not selection order).
    pub fn selected_rows(&self) -> Result<Vec<Row>, SelectionError> {
        if let Some(stale) = self.selected.iter().find(|i| !self.contains_row(**i)) {
            return Err(SelectionError::StaleIndex(*stale));
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| self.selected.contains(&r.row_index))
            .cloned()
            .collect())
    }
}
