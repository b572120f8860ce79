//! Runtime choice between the concrete row accessors.

use crate::access::{AccessMode, RowAccess};
use crate::checked::CheckedRow;
use crate::invalid::InvalidRow;
use crate::unchecked::UncheckedRow;
use alloc::string::String;
use tarn_core::schema::Column;
use tarn_core::{DataType, Result, RowId, Value};

/// A row produced by resolving a query.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedRow {
    Unchecked(UncheckedRow),
    Checked(CheckedRow),
    /// The query matched nothing.
    Invalid(InvalidRow),
}

impl ResolvedRow {
    /// Wraps `row` in the accessor selected by `mode`.
    pub fn wrap(row: UncheckedRow, mode: AccessMode) -> Self {
        match mode {
            AccessMode::Unchecked => ResolvedRow::Unchecked(row),
            AccessMode::Checked => ResolvedRow::Checked(CheckedRow::from_row(row)),
        }
    }

    /// The "no such row" sentinel.
    pub fn invalid() -> Self {
        ResolvedRow::Invalid(InvalidRow)
    }

    /// Returns the access mode, or `None` for the sentinel.
    pub fn access_mode(&self) -> Option<AccessMode> {
        match self {
            ResolvedRow::Unchecked(_) => Some(AccessMode::Unchecked),
            ResolvedRow::Checked(_) => Some(AccessMode::Checked),
            ResolvedRow::Invalid(_) => None,
        }
    }

    /// Returns true unless this is the sentinel.
    pub fn is_valid(&self) -> bool {
        !matches!(self, ResolvedRow::Invalid(_))
    }

    /// Returns the row id, or `None` for the sentinel.
    pub fn row_id(&self) -> Option<RowId> {
        match self {
            ResolvedRow::Unchecked(row) => Some(row.row_id()),
            ResolvedRow::Checked(row) => Some(row.row_id()),
            ResolvedRow::Invalid(_) => None,
        }
    }

    fn inner(&self) -> &dyn RowAccess {
        match self {
            ResolvedRow::Unchecked(row) => row,
            ResolvedRow::Checked(row) => row,
            ResolvedRow::Invalid(row) => row,
        }
    }
}

impl RowAccess for ResolvedRow {
    fn table_name(&self) -> Result<String> {
        self.inner().table_name()
    }

    fn index(&self) -> Result<RowId> {
        self.inner().index()
    }

    fn is_attached(&self) -> bool {
        self.inner().is_attached()
    }

    fn column_count(&self) -> Result<usize> {
        self.inner().column_count()
    }

    fn column(&self, column: usize) -> Result<Column> {
        self.inner().column(column)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.inner().column_index(name)
    }

    fn read_cell(&self, column: usize, expected: Option<DataType>) -> Result<Value> {
        self.inner().read_cell(column, expected)
    }

    fn write_cell(&self, column: usize, expected: Option<DataType>, value: Value) -> Result<()> {
        self.inner().write_cell(column, expected, value)
    }
}
