//! Schema module for Tarn datasets.
//!
//! This module contains the column and table definitions.

mod column;
mod table;

pub use column::Column;
pub use table::{Table, TableBuilder};
