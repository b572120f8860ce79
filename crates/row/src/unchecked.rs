//! Row accessor that trusts its caller.

use crate::access::RowAccess;
use alloc::string::String;
use tarn_core::schema::Column;
use tarn_core::{DataType, Result, RowId, Value};
use tarn_storage::Dataset;

/// Fast accessor for one row of a dataset table.
///
/// Getters fail only where the stored value cannot be produced as the
/// requested type. Setters write through without consulting the column's
/// declared type or nullability, so a caller can store an `Int64` in a
/// `String` column. Writes still need an open write transaction.
#[derive(Clone, Debug)]
pub struct UncheckedRow {
    dataset: Dataset,
    table: String,
    row_id: RowId,
}

impl UncheckedRow {
    pub fn new(dataset: Dataset, table: impl Into<String>, row_id: RowId) -> Self {
        Self {
            dataset,
            table: table.into(),
            row_id,
        }
    }

    /// Returns the dataset the row lives in.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Returns the table name without touching the dataset.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the row id without touching the dataset.
    pub fn row_id(&self) -> RowId {
        self.row_id
    }
}

impl PartialEq for UncheckedRow {
    fn eq(&self, other: &Self) -> bool {
        self.dataset.ptr_eq(&other.dataset) && self.table == other.table && self.row_id == other.row_id
    }
}

impl RowAccess for UncheckedRow {
    fn table_name(&self) -> Result<String> {
        Ok(self.table.clone())
    }

    fn index(&self) -> Result<RowId> {
        Ok(self.row_id)
    }

    fn is_attached(&self) -> bool {
        self.dataset.contains_row(&self.table, self.row_id)
    }

    fn column_count(&self) -> Result<usize> {
        self.dataset
            .with_table(&self.table, |store| store.schema().column_count())
    }

    fn column(&self, column: usize) -> Result<Column> {
        self.dataset
            .with_table(&self.table, |store| store.schema().require_column(column).cloned())?
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.dataset
            .with_table(&self.table, |store| store.schema().require_column_index(name))?
    }

    fn read_cell(&self, column: usize, _expected: Option<DataType>) -> Result<Value> {
        self.dataset.get_value(&self.table, self.row_id, column)
    }

    fn write_cell(&self, column: usize, _expected: Option<DataType>, value: Value) -> Result<()> {
        self.dataset.set_value(&self.table, self.row_id, column, value)
    }
}
