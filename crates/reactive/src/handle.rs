//! Row handles that may still be waiting for their query.

use crate::pending_row::PendingRow;
use alloc::rc::Rc;
use alloc::string::String;
use tarn_core::schema::Column;
use tarn_core::{DataType, Result, RowId, Value};
use tarn_row::{ResolvedRow, RowAccess};

/// Either a pending placeholder or the row it resolved to.
#[derive(Clone, Debug)]
pub enum RowHandle {
    Pending(Rc<PendingRow>),
    Resolved(ResolvedRow),
}

impl RowHandle {
    pub fn is_pending(&self) -> bool {
        matches!(self, RowHandle::Pending(_))
    }

    /// Returns the resolved row, if any.
    pub fn resolved(&self) -> Option<&ResolvedRow> {
        match self {
            RowHandle::Pending(_) => None,
            RowHandle::Resolved(row) => Some(row),
        }
    }

    fn inner(&self) -> &dyn RowAccess {
        match self {
            RowHandle::Pending(pending) => pending.as_ref(),
            RowHandle::Resolved(row) => row,
        }
    }
}

impl RowAccess for RowHandle {
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
