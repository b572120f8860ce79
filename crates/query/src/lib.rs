//! Tarn Query - Filtering and ordering rows of a Tarn table.
//!
//! This crate provides:
//!
//! - `ast`: Column references, comparison operators and predicates
//! - `executor`: `TableQuery` evaluation and `SortDescriptor` ordering
//!
//! # Example
//!
//! ```rust
//! use tarn_core::schema::TableBuilder;
//! use tarn_core::{DataType, Value};
//! use tarn_query::TableQuery;
//! use tarn_storage::Dataset;
//!
//! let schema = TableBuilder::new("people")
//!     .unwrap()
//!     .add_column("name", DataType::String)
//!     .unwrap()
//!     .add_column("age", DataType::Int64)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let dataset = Dataset::in_memory("demo");
//! dataset.create_table(schema.clone()).unwrap();
//! dataset
//!     .write(|ds| ds.insert("people", vec![Value::from("Alice"), Value::Int64(31)]))
//!     .unwrap();
//!
//! let query = TableQuery::new(&schema).greater_than("age", 30i64).unwrap();
//! assert_eq!(query.execute(&dataset).unwrap().len(), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod ast;
pub mod executor;

pub use ast::{ColumnRef, CompareOp, Predicate, SortOrder};
pub use executor::{SortDescriptor, TableQuery};
