//! Tarn Reactive - Live collections and deferred find-first rows.
//!
//! This crate keeps query results in step with a changing dataset and lets
//! callers ask for "the first row matching a query" without waiting for it.
//!
//! # Core Concepts
//!
//! - `Collection`: Query results that follow dataset commits and notify
//!   listeners
//! - `PendingRow`: Placeholder row that resolves once, to its `FrontEnd`
//! - `RowHandle`: A row that is either still pending or resolved
//! - `ProxyState`: Ready-made `FrontEnd` that swaps in the resolved row
//!
//! # Example
//!
//! ```rust
//! use tarn_core::schema::TableBuilder;
//! use tarn_core::{DataType, Value};
//! use tarn_query::TableQuery;
//! use tarn_reactive::find_first_async;
//! use tarn_row::{AccessMode, RowAccess};
//! use tarn_storage::Dataset;
//!
//! let dataset = Dataset::in_memory("demo");
//! dataset
//!     .create_table(
//!         TableBuilder::new("people")
//!             .unwrap()
//!             .add_column("name", DataType::String)
//!             .unwrap()
//!             .add_column("age", DataType::Int64)
//!             .unwrap()
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let query = TableQuery::for_table(&dataset, "people")
//!     .unwrap()
//!     .greater_than("age", 30i64)
//!     .unwrap();
//! let proxy = find_first_async(&dataset, query, None, AccessMode::Checked);
//! assert!(!proxy.is_loaded());
//!
//! dataset
//!     .write(|ds| ds.insert("people", vec![Value::from("Alice"), Value::Int64(31)]))
//!     .unwrap();
//! assert!(proxy.is_loaded());
//! assert_eq!(proxy.with_row(|row| row.get_long(1)).unwrap(), 31);
//! ```

#![no_std]

extern crate alloc;

mod collection;
mod front_end;
mod handle;
mod listener;
mod pending_row;
mod proxy;

pub use collection::Collection;
pub use front_end::FrontEnd;
pub use handle::RowHandle;
pub use listener::{ListenerCallback, ListenerKey, ListenerSet, ListenerToken};
pub use pending_row::PendingRow;
pub use proxy::{find_first_async, ProxyState};
