//! The row accessor trait and access modes.

use crate::link_view::LinkView;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use tarn_core::schema::Column;
use tarn_core::{DataType, Error, Result, RowId, Value};

/// How a row accessor validates its operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Trust the caller; only fail where a value cannot be produced.
    #[default]
    Unchecked,
    /// Re-validate dataset, row, column and type on every access.
    Checked,
}

impl AccessMode {
    pub fn name(&self) -> &'static str {
        match self {
            AccessMode::Unchecked => "unchecked",
            AccessMode::Checked => "checked",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn mismatch(expected: DataType, value: &Value) -> Error {
    Error::type_mismatch(expected, value.data_type())
}

/// Read and write access to one row.
///
/// Implementors provide column introspection plus `read_cell` and
/// `write_cell`; the typed getters and setters are built on top of those.
/// The `expected` argument names the type the accessor works with, or
/// `None` for type-agnostic accesses such as `is_null` and `set_null`.
pub trait RowAccess {
    /// Returns the name of the table the row belongs to.
    fn table_name(&self) -> Result<String>;

    /// Returns the row identifier.
    fn index(&self) -> Result<RowId>;

    /// Returns true if the accessor refers to a live row.
    fn is_attached(&self) -> bool;

    /// Returns the number of columns of the row's table.
    fn column_count(&self) -> Result<usize>;

    /// Returns the schema of one column.
    fn column(&self, column: usize) -> Result<Column>;

    /// Resolves a column name to its index.
    fn column_index(&self, name: &str) -> Result<usize>;

    /// Reads one cell.
    fn read_cell(&self, column: usize, expected: Option<DataType>) -> Result<Value>;

    /// Writes one cell.
    fn write_cell(&self, column: usize, expected: Option<DataType>, value: Value) -> Result<()>;

    fn column_name(&self, column: usize) -> Result<String> {
        Ok(self.column(column)?.name().to_string())
    }

    fn column_type(&self, column: usize) -> Result<DataType> {
        Ok(self.column(column)?.data_type())
    }

    /// Returns true if the table has a column named `name`.
    fn has_column(&self, name: &str) -> Result<bool> {
        match self.column_index(name) {
            Ok(_) => Ok(true),
            Err(Error::ColumnNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn get_long(&self, column: usize) -> Result<i64> {
        let value = self.read_cell(column, Some(DataType::Int64))?;
        value.as_i64().ok_or_else(|| mismatch(DataType::Int64, &value))
    }

    fn get_boolean(&self, column: usize) -> Result<bool> {
        let value = self.read_cell(column, Some(DataType::Boolean))?;
        value
            .as_bool()
            .ok_or_else(|| mismatch(DataType::Boolean, &value))
    }

    fn get_float(&self, column: usize) -> Result<f32> {
        let value = self.read_cell(column, Some(DataType::Float32))?;
        value
            .as_f32()
            .ok_or_else(|| mismatch(DataType::Float32, &value))
    }

    fn get_double(&self, column: usize) -> Result<f64> {
        let value = self.read_cell(column, Some(DataType::Float64))?;
        value
            .as_f64()
            .ok_or_else(|| mismatch(DataType::Float64, &value))
    }

    /// Reads a date as milliseconds since the Unix epoch.
    fn get_date(&self, column: usize) -> Result<i64> {
        let value = self.read_cell(column, Some(DataType::DateTime))?;
        value
            .as_datetime()
            .ok_or_else(|| mismatch(DataType::DateTime, &value))
    }

    /// Reads a string. A null cell reads as `None`.
    fn get_string(&self, column: usize) -> Result<Option<String>> {
        let value = self.read_cell(column, Some(DataType::String))?;
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(mismatch(DataType::String, &other)),
        }
    }

    /// Reads a byte array. A null cell reads as `None`.
    fn get_binary(&self, column: usize) -> Result<Option<Vec<u8>>> {
        let value = self.read_cell(column, Some(DataType::Bytes))?;
        match value {
            Value::Null => Ok(None),
            Value::Bytes(b) => Ok(Some(b)),
            other => Err(mismatch(DataType::Bytes, &other)),
        }
    }

    /// Reads the target of a link. A null link reads as `None`.
    fn get_link(&self, column: usize) -> Result<Option<RowId>> {
        let value = self.read_cell(column, Some(DataType::Link))?;
        match value {
            Value::Null => Ok(None),
            Value::Link(id) => Ok(Some(id)),
            other => Err(mismatch(DataType::Link, &other)),
        }
    }

    fn is_null_link(&self, column: usize) -> Result<bool> {
        Ok(self.get_link(column)?.is_none())
    }

    /// Reads a link list together with the table its ids refer to.
    fn get_link_list(&self, column: usize) -> Result<LinkView> {
        let value = self.read_cell(column, Some(DataType::LinkList))?;
        let row_ids = value
            .as_link_list()
            .ok_or_else(|| mismatch(DataType::LinkList, &value))?
            .to_vec();
        let schema = self.column(column)?;
        let target = schema
            .target_table()
            .ok_or_else(|| Error::type_mismatch(DataType::LinkList, Some(schema.data_type())))?;
        Ok(LinkView::new(target, row_ids))
    }

    fn is_null(&self, column: usize) -> Result<bool> {
        Ok(self.read_cell(column, None)?.is_null())
    }

    fn set_long(&self, column: usize, value: i64) -> Result<()> {
        self.write_cell(column, Some(DataType::Int64), Value::Int64(value))
    }

    fn set_boolean(&self, column: usize, value: bool) -> Result<()> {
        self.write_cell(column, Some(DataType::Boolean), Value::Boolean(value))
    }

    fn set_float(&self, column: usize, value: f32) -> Result<()> {
        self.write_cell(column, Some(DataType::Float32), Value::Float32(value))
    }

    fn set_double(&self, column: usize, value: f64) -> Result<()> {
        self.write_cell(column, Some(DataType::Float64), Value::Float64(value))
    }

    /// Writes a date given in milliseconds since the Unix epoch.
    fn set_date(&self, column: usize, millis: i64) -> Result<()> {
        self.write_cell(column, Some(DataType::DateTime), Value::DateTime(millis))
    }

    fn set_string(&self, column: usize, value: &str) -> Result<()> {
        self.write_cell(column, Some(DataType::String), Value::String(value.into()))
    }

    fn set_binary(&self, column: usize, value: &[u8]) -> Result<()> {
        self.write_cell(column, Some(DataType::Bytes), Value::Bytes(value.to_vec()))
    }

    fn set_link(&self, column: usize, target: RowId) -> Result<()> {
        self.write_cell(column, Some(DataType::Link), Value::Link(target))
    }

    fn set_link_list(&self, column: usize, targets: Vec<RowId>) -> Result<()> {
        self.write_cell(column, Some(DataType::LinkList), Value::LinkList(targets))
    }

    fn nullify_link(&self, column: usize) -> Result<()> {
        self.write_cell(column, Some(DataType::Link), Value::Null)
    }

    fn set_null(&self, column: usize) -> Result<()> {
        self.write_cell(column, None, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;
    use tarn_core::schema::Table;

    /// In-memory accessor over a fixed schema, for exercising the defaults.
    struct Cells {
        schema: Table,
        values: RefCell<Vec<Value>>,
    }

    impl Cells {
        fn new() -> Self {
            let schema = Table::new(
                "things",
                vec![
                    Column::new("count", DataType::Int64),
                    Column::new("label", DataType::String).nullable(true),
                    Column::link("parent", "things"),
                    Column::link_list("children", "things"),
                ],
            );
            Self {
                schema,
                values: RefCell::new(vec![
                    Value::Int64(3),
                    Value::Null,
                    Value::Link(7),
                    Value::LinkList(vec![1, 2]),
                ]),
            }
        }
    }

    impl RowAccess for Cells {
        fn table_name(&self) -> Result<String> {
            Ok(self.schema.name().into())
        }

        fn index(&self) -> Result<RowId> {
            Ok(0)
        }

        fn is_attached(&self) -> bool {
            true
        }

        fn column_count(&self) -> Result<usize> {
            Ok(self.schema.column_count())
        }

        fn column(&self, column: usize) -> Result<Column> {
            self.schema.require_column(column).cloned()
        }

        fn column_index(&self, name: &str) -> Result<usize> {
            self.schema.require_column_index(name)
        }

        fn read_cell(&self, column: usize, _expected: Option<DataType>) -> Result<Value> {
            self.values
                .borrow()
                .get(column)
                .cloned()
                .ok_or_else(|| Error::column_out_of_range("things", column))
        }

        fn write_cell(&self, column: usize, _expected: Option<DataType>, value: Value) -> Result<()> {
            self.values.borrow_mut()[column] = value;
            Ok(())
        }
    }

    #[test]
    fn test_typed_getters() {
        let cells = Cells::new();
        assert_eq!(cells.get_long(0), Ok(3));
        assert_eq!(cells.get_string(1), Ok(None));
        assert_eq!(cells.get_link(2), Ok(Some(7)));
        assert_eq!(cells.is_null_link(2), Ok(false));
        assert!(cells.is_null(1).unwrap());

        let children = cells.get_link_list(3).unwrap();
        assert_eq!(children.target_table(), "things");
        assert_eq!(children.row_ids(), &[1, 2]);
    }

    #[test]
    fn test_getter_type_mismatch() {
        let cells = Cells::new();
        assert_eq!(
            cells.get_boolean(0),
            Err(Error::type_mismatch(DataType::Boolean, Some(DataType::Int64)))
        );
        assert_eq!(
            cells.get_long(1),
            Err(Error::type_mismatch(DataType::Int64, None))
        );
    }

    #[test]
    fn test_setters_route_through_write_cell() {
        let cells = Cells::new();
        cells.set_long(0, 10).unwrap();
        cells.set_string(1, "ten").unwrap();
        cells.nullify_link(2).unwrap();

        assert_eq!(cells.get_long(0), Ok(10));
        assert_eq!(cells.get_string(1), Ok(Some("ten".into())));
        assert_eq!(cells.is_null_link(2), Ok(true));
    }

    #[test]
    fn test_introspection() {
        let cells = Cells::new();
        assert_eq!(cells.column_name(1).unwrap(), "label");
        assert_eq!(cells.column_type(2).unwrap(), DataType::Link);
        assert_eq!(cells.has_column("count"), Ok(true));
        assert_eq!(cells.has_column("missing"), Ok(false));
    }

    #[test]
    fn test_access_mode_default() {
        assert_eq!(AccessMode::default(), AccessMode::Unchecked);
        assert_eq!(AccessMode::Checked.name(), "checked");
    }
}
