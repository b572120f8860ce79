//! Stored row record.
//!
//! This module defines the `Row` struct which holds the cell values of a single
//! table row. Rows are addressed by a table-local `RowId` that never gets reused.

use crate::value::Value;
use alloc::vec::Vec;

/// Table-local identifier of a row. Also the row's index as seen by accessors.
pub type RowId = u64;

/// A row in a table.
#[derive(Clone, Debug)]
pub struct Row {
    /// Identifier within the owning table.
    id: RowId,
    /// Incremented on each cell write.
    version: u64,
    /// Values stored in this row, indexed by column position.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given ID and values.
    /// Version defaults to 1 for new rows.
    pub fn new(id: RowId, values: Vec<Value>) -> Self {
        Self {
            id,
            version: 1,
            values,
        }
    }

    /// Returns the row ID.
    #[inline]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns the version number.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value at the given column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Sets a value at the given column index and bumps the version.
    ///
    /// Returns false if the column index is out of range.
    pub fn set(&mut self, index: usize, value: Value) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                self.version = self.version.wrapping_add(1);
                true
            }
            None => false,
        }
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.values == other.values
    }
}
