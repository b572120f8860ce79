//! Query evaluation against row stores.

mod filter;
mod sort;

pub use filter::TableQuery;
pub use sort::SortDescriptor;
