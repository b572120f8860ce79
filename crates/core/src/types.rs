//! Field type definitions for Tarn datasets.
//!
//! This module defines the column types a table schema can declare.

/// Supported field types in a Tarn table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type (true/false)
    Boolean,
    /// 64-bit signed integer
    Int64,
    /// 32-bit floating point number
    Float32,
    /// 64-bit floating point number
    Float64,
    /// UTF-8 string
    String,
    /// Date and time stored as Unix timestamp (milliseconds)
    DateTime,
    /// Binary data
    Bytes,
    /// Link to a single row of another table
    Link,
    /// Ordered list of links to rows of another table
    LinkList,
}

impl DataType {
    /// Returns the lowercase name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::String => "string",
            DataType::DateTime => "datetime",
            DataType::Bytes => "bytes",
            DataType::Link => "link",
            DataType::LinkList => "link_list",
        }
    }

    /// Returns whether this type is nullable by default.
    ///
    /// A single link is null until it points at something; binary blobs
    /// follow the same convention.
    pub fn is_nullable_by_default(&self) -> bool {
        matches!(self, DataType::Bytes | DataType::Link)
    }

    /// Returns whether columns of this type reference another table.
    pub fn is_link(&self) -> bool {
        matches!(self, DataType::Link | DataType::LinkList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_equality() {
        assert_eq!(DataType::Int64, DataType::Int64);
        assert_ne!(DataType::Float32, DataType::Float64);
    }

    #[test]
    fn test_nullable_by_default() {
        assert!(!DataType::Boolean.is_nullable_by_default());
        assert!(!DataType::Int64.is_nullable_by_default());
        assert!(!DataType::String.is_nullable_by_default());
        assert!(!DataType::LinkList.is_nullable_by_default());
        assert!(DataType::Bytes.is_nullable_by_default());
        assert!(DataType::Link.is_nullable_by_default());
    }

    #[test]
    fn test_is_link() {
        assert!(DataType::Link.is_link());
        assert!(DataType::LinkList.is_link());
        assert!(!DataType::Int64.is_link());
        assert!(!DataType::Bytes.is_link());
    }

    #[test]
    fn test_name() {
        assert_eq!(DataType::DateTime.name(), "datetime");
        assert_eq!(DataType::LinkList.name(), "link_list");
    }
}
