//! Tarn Storage - Storage layer for Tarn datasets.
//!
//! This crate provides the storage layer including:
//!
//! - `RowStore`: Row storage for a single table
//! - `Dataset`: Shared, versioned handle over a set of tables with write
//!   transactions and close semantics
//! - `DatasetObserver`: Weakly-held observers notified when the dataset
//!   advances to a new version or closes
//! - `DatasetConfig`: Options a dataset is opened with
//!
//! # Example
//!
//! ```rust
//! use tarn_storage::Dataset;
//! use tarn_core::schema::TableBuilder;
//! use tarn_core::{DataType, Value};
//!
//! let dataset = Dataset::in_memory("app");
//! let schema = TableBuilder::new("people")
//!     .unwrap()
//!     .add_column("name", DataType::String)
//!     .unwrap()
//!     .add_column("age", DataType::Int64)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! dataset.create_table(schema).unwrap();
//!
//! let id = dataset
//!     .write(|ds| ds.insert("people", vec![Value::String("Alice".into()), Value::Int64(31)]))
//!     .unwrap();
//!
//! assert_eq!(dataset.version(), 1);
//! assert_eq!(dataset.get_value("people", id, 1).unwrap(), Value::Int64(31));
//! ```

#![no_std]

extern crate alloc;

pub mod config;
pub mod dataset;
pub mod observer;
pub mod row_store;

pub use config::DatasetConfig;
pub use dataset::Dataset;
pub use observer::{DatasetEvent, DatasetObserver, ObserverId, ObserverRegistry};
pub use row_store::RowStore;
