//! Tarn Row - Accessors for individual rows of a Tarn dataset.
//!
//! Rows are read and written through the [`RowAccess`] trait. Two concrete
//! accessors exist:
//!
//! - [`UncheckedRow`]: trusts the caller and writes straight through
//! - [`CheckedRow`]: re-validates the dataset, the row, the column and the
//!   declared type before every access
//!
//! [`InvalidRow`] stands in for "no such row", and [`ResolvedRow`] selects
//! between the three at runtime according to an [`AccessMode`].
//!
//! # Example
//!
//! ```rust
//! use tarn_core::schema::TableBuilder;
//! use tarn_core::{DataType, Value};
//! use tarn_row::{CheckedRow, RowAccess, UncheckedRow};
//! use tarn_storage::Dataset;
//!
//! let dataset = Dataset::in_memory("demo");
//! dataset
//!     .create_table(
//!         TableBuilder::new("people")
//!             .unwrap()
//!             .add_column("name", DataType::String)
//!             .unwrap()
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//! let id = dataset
//!     .write(|ds| ds.insert("people", vec![Value::from("Alice")]))
//!     .unwrap();
//!
//! let row = CheckedRow::from_row(UncheckedRow::new(dataset.clone(), "people", id));
//! assert_eq!(row.get_string(0).unwrap().as_deref(), Some("Alice"));
//! assert!(row.get_long(0).is_err());
//! ```

#![no_std]

extern crate alloc;

mod access;
mod checked;
mod invalid;
mod link_view;
mod resolved;
mod unchecked;

pub use access::{AccessMode, RowAccess};
pub use checked::CheckedRow;
pub use invalid::InvalidRow;
pub use link_view::LinkView;
pub use resolved::ResolvedRow;
pub use unchecked::UncheckedRow;
