//! Receivers of resolved rows.

use tarn_row::ResolvedRow;

/// An object waiting for a pending row to resolve.
///
/// `on_query_finished` is called at most once per pending row, and only when
/// a dataset change resolves it. Rows forced with `PendingRow::resolve_now`
/// are returned to the caller instead.
pub trait FrontEnd {
    fn on_query_finished(&self, row: ResolvedRow);
}
