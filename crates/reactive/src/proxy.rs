//! Row proxies backed by a deferred find-first query.

use crate::front_end::FrontEnd;
use crate::handle::RowHandle;
use crate::pending_row::PendingRow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use tarn_core::Result;
use tarn_query::{SortDescriptor, TableQuery};
use tarn_row::{AccessMode, ResolvedRow, RowAccess};
use tarn_storage::Dataset;
use tracing::trace;

type LoadListener = Box<dyn FnOnce(&ResolvedRow)>;

/// Holds the row of a find-first query, swapping the placeholder for the
/// real row once it arrives.
pub struct ProxyState {
    handle: RefCell<RowHandle>,
    load_listeners: RefCell<Vec<LoadListener>>,
}

impl ProxyState {
    /// Wraps a pending row. Does not attach the proxy as its owner.
    pub fn new(pending: Rc<PendingRow>) -> Rc<Self> {
        Rc::new(Self {
            handle: RefCell::new(RowHandle::Pending(pending)),
            load_listeners: RefCell::new(Vec::new()),
        })
    }

    /// Returns true once a row, or the "no such row" sentinel, is installed.
    pub fn is_loaded(&self) -> bool {
        !self.handle.borrow().is_pending()
    }

    /// Returns true if a row is loaded and still attached.
    pub fn is_valid(&self) -> bool {
        match &*self.handle.borrow() {
            RowHandle::Pending(_) => false,
            RowHandle::Resolved(row) => row.is_valid() && row.is_attached(),
        }
    }

    /// Forces resolution and returns whether a row was found.
    ///
    /// Load listeners are not called for a forced load.
    pub fn load(&self) -> Result<bool> {
        let pending = match &*self.handle.borrow() {
            RowHandle::Pending(pending) => pending.clone(),
            RowHandle::Resolved(row) => return Ok(row.is_valid()),
        };
        let row = pending.resolve_now()?;
        let found = row.is_valid();
        *self.handle.borrow_mut() = RowHandle::Resolved(row);
        self.load_listeners.borrow_mut().clear();
        Ok(found)
    }

    /// Runs `f` against the current handle.
    ///
    /// `f` sees the handle as it was on entry. It may write to the dataset,
    /// which can load the proxy while `f` runs.
    pub fn with_row<R>(&self, f: impl FnOnce(&RowHandle) -> R) -> R {
        let handle = self.handle.borrow().clone();
        f(&handle)
    }

    /// Registers a callback for when the row arrives through a dataset
    /// change. Callbacks registered after loading are dropped.
    pub fn add_load_listener<F>(&self, f: F)
    where
        F: FnOnce(&ResolvedRow) + 'static,
    {
        if !self.is_loaded() {
            self.load_listeners.borrow_mut().push(Box::new(f));
        }
    }
}

impl FrontEnd for ProxyState {
    fn on_query_finished(&self, row: ResolvedRow) {
        *self.handle.borrow_mut() = RowHandle::Resolved(row.clone());
        let listeners = core::mem::take(&mut *self.load_listeners.borrow_mut());
        trace!(listeners = listeners.len(), "proxy row loaded");
        for listener in listeners {
            listener(&row);
        }
    }
}

impl core::fmt::Debug for ProxyState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProxyState")
            .field("handle", &*self.handle.borrow())
            .field("load_listeners", &self.load_listeners.borrow().len())
            .finish()
    }
}

/// Issues an asynchronous find-first query and returns a proxy for its row.
///
/// The proxy is the pending row's owner; dropping the proxy abandons the
/// query.
pub fn find_first_async(
    dataset: &Dataset,
    query: TableQuery,
    sort: Option<SortDescriptor>,
    mode: AccessMode,
) -> Rc<ProxyState> {
    let pending = PendingRow::new(dataset, query, sort, mode);
    let proxy = ProxyState::new(pending.clone());
    pending.attach_owner(&proxy);
    proxy
}
