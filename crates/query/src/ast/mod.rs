//! Query AST definitions.

mod expr;
mod predicate;

pub use expr::{ColumnRef, CompareOp, SortOrder};
pub use predicate::Predicate;
