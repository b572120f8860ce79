//! Tarn Core - Core types and schema definitions for Tarn datasets.
//!
//! This crate provides the foundational types shared by every Tarn crate:
//!
//! - `DataType`: Supported field types (Boolean, Int64, Float32, Float64, String,
//!   DateTime, Bytes, Link, LinkList)
//! - `Value`: Runtime values that can be stored in a table cell
//! - `Row`: A stored row of values with a table-local identifier
//! - `schema`: Schema definitions (Column, Table, TableBuilder)
//! - `Error`: Error types for dataset and row operations
//!
//! # Example
//!
//! ```rust
//! use tarn_core::{DataType, Value, Row};
//! use tarn_core::schema::TableBuilder;
//!
//! let table = TableBuilder::new("people")
//!     .unwrap()
//!     .add_column("name", DataType::String)
//!     .unwrap()
//!     .add_column("age", DataType::Int64)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let row = Row::new(0, vec![Value::String("Alice".into()), Value::Int64(31)]);
//!
//! assert_eq!(table.get_column_index("age"), Some(1));
//! assert_eq!(row.get(1), Some(&Value::Int64(31)));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod row;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use row::{Row, RowId};
pub use types::DataType;
pub use value::Value;
