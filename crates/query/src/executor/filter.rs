//! Table query builder and evaluator.

use crate::ast::{ColumnRef, CompareOp, Predicate};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use tarn_core::schema::Table;
use tarn_core::{Error, Result, Row, RowId, Value};
use tarn_storage::{Dataset, RowStore};
use tracing::trace;

/// A filter over one table, with column names resolved against its schema.
///
/// Builder methods consume the query and return it extended with an extra
/// condition combined by AND. Unknown columns fail with `ColumnNotFound`.
#[derive(Clone, Debug, PartialEq)]
pub struct TableQuery {
    schema: Table,
    predicate: Predicate,
}

impl TableQuery {
    /// Creates a query matching every row of the table.
    pub fn new(schema: &Table) -> Self {
        Self {
            schema: schema.clone(),
            predicate: Predicate::All,
        }
    }

    /// Creates a query matching every row of a dataset table.
    pub fn for_table(dataset: &Dataset, table: &str) -> Result<Self> {
        Ok(Self::new(&dataset.schema(table)?))
    }

    /// Returns the name of the queried table.
    pub fn table_name(&self) -> &str {
        self.schema.name()
    }

    /// Returns the schema the query was built against.
    pub fn schema(&self) -> &Table {
        &self.schema
    }

    /// Returns the current predicate.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    fn column(&self, name: &str) -> Result<ColumnRef> {
        let index = self.schema.require_column_index(name)?;
        Ok(ColumnRef::new(name, index))
    }

    fn with(mut self, predicate: Predicate) -> Self {
        let current = core::mem::replace(&mut self.predicate, Predicate::All);
        self.predicate = current.and(predicate);
        self
    }

    fn compare(self, column: &str, op: CompareOp, value: Value) -> Result<Self> {
        let column = self.column(column)?;
        Ok(self.with(Predicate::Compare { column, op, value }))
    }

    /// Rows whose column equals `value`.
    pub fn equal_to(self, column: &str, value: impl Into<Value>) -> Result<Self> {
        self.compare(column, CompareOp::Eq, value.into())
    }

    /// Rows whose column differs from `value`.
    pub fn not_equal_to(self, column: &str, value: impl Into<Value>) -> Result<Self> {
        self.compare(column, CompareOp::Ne, value.into())
    }

    pub fn greater_than(self, column: &str, value: impl Into<Value>) -> Result<Self> {
        self.compare(column, CompareOp::Gt, value.into())
    }

    pub fn greater_than_or_equal(self, column: &str, value: impl Into<Value>) -> Result<Self> {
        self.compare(column, CompareOp::Ge, value.into())
    }

    pub fn less_than(self, column: &str, value: impl Into<Value>) -> Result<Self> {
        self.compare(column, CompareOp::Lt, value.into())
    }

    pub fn less_than_or_equal(self, column: &str, value: impl Into<Value>) -> Result<Self> {
        self.compare(column, CompareOp::Le, value.into())
    }

    /// Rows whose column is null.
    pub fn is_null(self, column: &str) -> Result<Self> {
        let column = self.column(column)?;
        Ok(self.with(Predicate::IsNull(column)))
    }

    /// Rows whose column is not null.
    pub fn is_not_null(self, column: &str) -> Result<Self> {
        let column = self.column(column)?;
        Ok(self.with(Predicate::IsNotNull(column)))
    }

    /// Rows whose string column contains `needle`.
    pub fn contains(self, column: &str, needle: impl Into<String>) -> Result<Self> {
        let column = self.column(column)?;
        Ok(self.with(Predicate::Contains {
            column,
            needle: needle.into(),
        }))
    }

    fn ensure_same_table(&self, other: &TableQuery) -> Result<()> {
        if self.table_name() == other.table_name() {
            Ok(())
        } else {
            Err(Error::invalid_operation(format!(
                "Cannot combine queries over {} and {}",
                self.table_name(),
                other.table_name()
            )))
        }
    }

    /// Rows matching both queries.
    pub fn and(self, other: TableQuery) -> Result<Self> {
        self.ensure_same_table(&other)?;
        Ok(self.with(other.predicate))
    }

    /// Rows matching either query.
    pub fn or(mut self, other: TableQuery) -> Result<Self> {
        self.ensure_same_table(&other)?;
        let current = core::mem::replace(&mut self.predicate, Predicate::All);
        self.predicate = current.or(other.predicate);
        Ok(self)
    }

    /// Rows not matching this query.
    pub fn not(mut self) -> Self {
        let current = core::mem::replace(&mut self.predicate, Predicate::All);
        self.predicate = !current;
        self
    }

    /// Returns true if `row` satisfies the query.
    #[inline]
    pub fn matches(&self, row: &Row) -> bool {
        self.predicate.eval(row)
    }

    /// Returns the ids of matching rows in ascending order.
    pub fn find_all(&self, store: &RowStore) -> Vec<RowId> {
        let ids: Vec<RowId> = store
            .scan()
            .into_iter()
            .filter(|row| self.matches(row))
            .map(Row::id)
            .collect();
        trace!(
            table = self.table_name(),
            scanned = store.len(),
            matched = ids.len(),
            "evaluated table query"
        );
        ids
    }

    /// Returns the lowest matching row id.
    pub fn find_first(&self, store: &RowStore) -> Option<RowId> {
        store
            .scan()
            .into_iter()
            .find(|row| self.matches(row))
            .map(Row::id)
    }

    /// Returns the number of matching rows.
    pub fn count(&self, store: &RowStore) -> usize {
        store.scan().into_iter().filter(|row| self.matches(row)).count()
    }

    /// Evaluates the query against the table's current rows in `dataset`.
    pub fn execute(&self, dataset: &Dataset) -> Result<Vec<RowId>> {
        dataset.with_table(self.table_name(), |store| self.find_all(store))
    }
}
