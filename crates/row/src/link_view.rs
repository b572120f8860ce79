//! Snapshot of a link-list cell.

use alloc::string::String;
use alloc::vec::Vec;
use tarn_core::RowId;

/// The ordered row ids of a link-list cell and the table they refer to.
///
/// The view is a copy taken at read time; it does not follow later writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkView {
    target_table: String,
    row_ids: Vec<RowId>,
}

impl LinkView {
    pub fn new(target_table: impl Into<String>, row_ids: Vec<RowId>) -> Self {
        Self {
            target_table: target_table.into(),
            row_ids,
        }
    }

    /// Returns the name of the table the links point into.
    pub fn target_table(&self) -> &str {
        &self.target_table
    }

    pub fn row_ids(&self) -> &[RowId] {
        &self.row_ids
    }

    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<RowId> {
        self.row_ids.get(position).copied()
    }

    pub fn contains(&self, row_id: RowId) -> bool {
        self.row_ids.contains(&row_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.row_ids.iter().copied()
    }
}

impl IntoIterator for LinkView {
    type Item = RowId;
    type IntoIter = alloc::vec::IntoIter<RowId>;

    fn into_iter(self) -> Self::IntoIter {
        self.row_ids.into_iter()
    }
}
