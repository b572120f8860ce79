//! Error types for Tarn.

use crate::row::RowId;
use crate::types::DataType;
use alloc::string::String;
use core::fmt;

/// Result type alias for Tarn operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for Tarn operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Type mismatch error.
    TypeMismatch {
        expected: DataType,
        got: Option<DataType>,
    },
    /// Null written to a non-nullable column.
    NullConstraint {
        column: String,
    },
    /// Column not found by name.
    ColumnNotFound {
        table: String,
        column: String,
    },
    /// Column index outside the table's column range.
    ColumnIndexOutOfRange {
        table: String,
        index: usize,
    },
    /// Table not found.
    TableNotFound {
        name: String,
    },
    /// Row not present in the table.
    RowNotFound {
        table: String,
        row: RowId,
    },
    /// Accessor used after its row was deleted or never existed.
    RowDetached {
        table: String,
        row: Option<RowId>,
    },
    /// Invalid schema definition.
    InvalidSchema {
        message: String,
    },
    /// The dataset has been closed.
    DatasetClosed {
        name: String,
    },
    /// A mutation was attempted outside a write transaction.
    NotInWriteTransaction,
    /// Invalid operation.
    InvalidOperation {
        message: String,
    },
    /// Row data accessed before its deferred query produced a result.
    QueryNotExecuted,
    /// Deferred row resolution attempted before an owner was attached.
    OwnerNotAttached,
    /// Deferred row resolution attempted after it already happened.
    AlreadyResolved,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch { expected, got } => match got {
                Some(got) => write!(
                    f,
                    "Type mismatch: expected {}, got {}",
                    expected.name(),
                    got.name()
                ),
                None => write!(f, "Type mismatch: expected {}, got null", expected.name()),
            },
            Error::NullConstraint { column } => {
                write!(f, "Null constraint violation on column: {}", column)
            }
            Error::ColumnNotFound { table, column } => {
                write!(f, "Column {} not found in table {}", column, table)
            }
            Error::ColumnIndexOutOfRange { table, index } => {
                write!(f, "Column index {} out of range for table {}", index, table)
            }
            Error::TableNotFound { name } => {
                write!(f, "Table not found: {}", name)
            }
            Error::RowNotFound { table, row } => {
                write!(f, "Row {} not found in table {}", row, table)
            }
            Error::RowDetached { table, row } => match row {
                Some(row) => write!(f, "Row {} of table {} is no longer valid", row, table),
                None => write!(f, "Row is not attached to a table"),
            },
            Error::InvalidSchema { message } => {
                write!(f, "Invalid schema: {}", message)
            }
            Error::DatasetClosed { name } => {
                write!(f, "Dataset {} has been closed", name)
            }
            Error::NotInWriteTransaction => {
                write!(f, "Cannot modify data outside a write transaction")
            }
            Error::InvalidOperation { message } => {
                write!(f, "Invalid operation: {}", message)
            }
            Error::QueryNotExecuted => {
                write!(f, "The pending query has not been executed yet")
            }
            Error::OwnerNotAttached => {
                write!(f, "No owner has been attached to the pending row")
            }
            Error::AlreadyResolved => {
                write!(f, "The pending row has already been resolved and is no longer usable")
            }
        }
    }
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: DataType, got: Option<DataType>) -> Self {
        Error::TypeMismatch { expected, got }
    }

    /// Creates a null constraint error.
    pub fn null_constraint(column: impl Into<String>) -> Self {
        Error::NullConstraint {
            column: column.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a column index out of range error.
    pub fn column_out_of_range(table: impl Into<String>, index: usize) -> Self {
        Error::ColumnIndexOutOfRange {
            table: table.into(),
            index,
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Error::TableNotFound { name: name.into() }
    }

    /// Creates a row not found error.
    pub fn row_not_found(table: impl Into<String>, row: RowId) -> Self {
        Error::RowNotFound {
            table: table.into(),
            row,
        }
    }

    /// Creates a detached row error.
    pub fn row_detached(table: impl Into<String>, row: Option<RowId>) -> Self {
        Error::RowDetached {
            table: table.into(),
            row,
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    /// Creates a dataset closed error.
    pub fn dataset_closed(name: impl Into<String>) -> Self {
        Error::DatasetClosed { name: name.into() }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true for errors raised by a deferred row that has not resolved.
    ///
    /// These are recoverable: wait for the next notification or force
    /// resolution.
    pub fn is_pending_query(&self) -> bool {
        matches!(self, Error::QueryNotExecuted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::type_mismatch(DataType::Int64, Some(DataType::String));
        assert!(err.to_string().contains("Type mismatch"));
        assert!(err.to_string().contains("string"));

        let err = Error::null_constraint("name");
        assert!(err.to_string().contains("name"));

        let err = Error::table_not_found("users");
        assert!(err.to_string().contains("users"));

        let err = Error::row_detached("people", Some(5));
        assert!(err.to_string().contains("no longer valid"));
    }

    #[test]
    fn test_pending_errors_are_distinct() {
        assert_ne!(Error::QueryNotExecuted, Error::OwnerNotAttached);
        assert_ne!(Error::OwnerNotAttached, Error::AlreadyResolved);
        assert!(Error::QueryNotExecuted.is_pending_query());
        assert!(!Error::AlreadyResolved.is_pending_query());
        assert!(Error::QueryNotExecuted.to_string().contains("not been executed"));
    }

    #[test]
    fn test_error_constructors() {
        match Error::column_out_of_range("people", 9) {
            Error::ColumnIndexOutOfRange { table, index } => {
                assert_eq!(table, "people");
                assert_eq!(index, 9);
            }
            _ => panic!("Wrong error type"),
        }
    }
}
