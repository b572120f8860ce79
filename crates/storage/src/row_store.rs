//! Row storage for Tarn datasets.
//!
//! This module provides the `RowStore` struct which manages the rows of a single
//! table. Row identifiers are assigned in increasing order and never reused, so
//! an accessor holding a deleted row's id can detect that it has been detached.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;
use tarn_core::schema::Table;
use tarn_core::{Error, Result, Row, RowId, Value};

/// Row storage backend: HashMap (O(1) lookup) or BTreeMap (ordered scans).
#[cfg(feature = "hash-store")]
type RowMap = hashbrown::HashMap<RowId, Row>;
#[cfg(not(feature = "hash-store"))]
type RowMap = BTreeMap<RowId, Row>;

/// Row storage for a single table.
#[derive(Clone, Debug)]
pub struct RowStore {
    schema: Table,
    rows: RowMap,
    next_row_id: RowId,
}

impl RowStore {
    /// Creates a new row store for the given table schema.
    pub fn new(schema: Table) -> Self {
        Self {
            schema,
            rows: RowMap::default(),
            next_row_id: 0,
        }
    }

    /// Returns the table schema.
    pub fn schema(&self) -> &Table {
        &self.schema
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inserts a row built from `values`, validated against the schema.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<RowId> {
        if values.len() != self.schema.column_count() {
            return Err(Error::invalid_operation(format!(
                "Table {} expects {} values, got {}",
                self.schema.name(),
                self.schema.column_count(),
                values.len()
            )));
        }
        for (column, value) in self.schema.columns().iter().zip(values.iter()) {
            column.check_value(value)?;
        }

        let row_id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.insert(row_id, Row::new(row_id, values));
        Ok(row_id)
    }

    /// Inserts a row holding every column's default value.
    pub fn insert_default(&mut self) -> RowId {
        let values = self
            .schema
            .columns()
            .iter()
            .map(|c| c.default_value())
            .collect();
        let row_id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.insert(row_id, Row::new(row_id, values));
        row_id
    }

    /// Gets a row by ID.
    pub fn get(&self, row_id: RowId) -> Option<&Row> {
        self.rows.get(&row_id)
    }

    /// Returns true if the row exists.
    pub fn contains(&self, row_id: RowId) -> bool {
        self.rows.contains_key(&row_id)
    }

    /// Deletes a row, returning it.
    pub fn delete(&mut self, row_id: RowId) -> Result<Row> {
        self.rows
            .remove(&row_id)
            .ok_or_else(|| Error::row_not_found(self.schema.name(), row_id))
    }

    /// Reads one cell.
    pub fn get_cell(&self, row_id: RowId, column: usize) -> Result<&Value> {
        let row = self
            .rows
            .get(&row_id)
            .ok_or_else(|| Error::row_not_found(self.schema.name(), row_id))?;
        row.get(column)
            .ok_or_else(|| Error::column_out_of_range(self.schema.name(), column))
    }

    /// Writes one cell without consulting the column's declared type.
    ///
    /// Callers that need schema validation check the value first.
    pub fn set_cell(&mut self, row_id: RowId, column: usize, value: Value) -> Result<()> {
        let row = self
            .rows
            .get_mut(&row_id)
            .ok_or_else(|| Error::row_not_found(self.schema.name(), row_id))?;
        if row.set(column, value) {
            Ok(())
        } else {
            Err(Error::column_out_of_range(self.schema.name(), column))
        }
    }

    /// Returns all row IDs in ascending order.
    pub fn row_ids(&self) -> Vec<RowId> {
        #[allow(unused_mut)]
        let mut ids: Vec<RowId> = self.rows.keys().copied().collect();
        #[cfg(feature = "hash-store")]
        ids.sort_unstable();
        ids
    }

    /// Returns all rows in ascending ID order.
    pub fn scan(&self) -> Vec<&Row> {
        #[allow(unused_mut)]
        let mut rows: Vec<&Row> = self.rows.values().collect();
        #[cfg(feature = "hash-store")]
        rows.sort_unstable_by_key(|r| r.id());
        rows
    }

    /// Clears links in this table that point at `row_id` of `target`.
    ///
    /// Single links become null, link lists drop every occurrence.
    pub fn unlink(&mut self, target: &str, row_id: RowId) -> usize {
        let columns: Vec<usize> = self
            .schema
            .columns()
            .iter()
            .filter(|c| c.target_table() == Some(target))
            .map(|c| c.index())
            .collect();
        if columns.is_empty() {
            return 0;
        }

        let mut cleared = 0;
        for row in self.rows.values_mut() {
            for &col in &columns {
                let replacement = match row.get(col) {
                    Some(Value::Link(id)) if *id == row_id => Some(Value::Null),
                    Some(Value::LinkList(ids)) if ids.contains(&row_id) => Some(Value::LinkList(
                        ids.iter().copied().filter(|id| *id != row_id).collect(),
                    )),
                    _ => None,
                };
                if let Some(value) = replacement {
                    row.set(col, value);
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Removes all rows. Row identifiers keep increasing.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
