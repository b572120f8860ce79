//! The "no such row" accessor.

use crate::access::RowAccess;
use alloc::string::String;
use tarn_core::schema::Column;
use tarn_core::{DataType, Error, Result, RowId, Value};

/// Accessor returned when a query matched no row.
///
/// Every accessor fails with `Error::RowDetached`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvalidRow;

impl InvalidRow {
    fn detached() -> Error {
        Error::row_detached("", None)
    }
}

impl RowAccess for InvalidRow {
    fn table_name(&self) -> Result<String> {
        Err(Self::detached())
    }

    fn index(&self) -> Result<RowId> {
        Err(Self::detached())
    }

    fn is_attached(&self) -> bool {
        false
    }

    fn column_count(&self) -> Result<usize> {
        Err(Self::detached())
    }

    fn column(&self, _column: usize) -> Result<Column> {
        Err(Self::detached())
    }

    fn column_index(&self, _name: &str) -> Result<usize> {
        Err(Self::detached())
    }

    fn read_cell(&self, _column: usize, _expected: Option<DataType>) -> Result<Value> {
        Err(Self::detached())
    }

    fn write_cell(&self, _column: usize, _expected: Option<DataType>, _value: Value) -> Result<()> {
        Err(Self::detached())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_access_fails() {
        let row = InvalidRow;
        assert!(!row.is_attached());
        assert_eq!(row.get_long(0), Err(InvalidRow::detached()));
        assert_eq!(row.set_string(0, "x"), Err(InvalidRow::detached()));
        assert_eq!(row.has_column("x"), Err(InvalidRow::detached()));
        assert_eq!(row.table_name(), Err(InvalidRow::detached()));
    }
}
