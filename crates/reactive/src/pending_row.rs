//! Deferred find-first rows.
//!
//! A `PendingRow` is handed out as soon as an asynchronous "first matching
//! row" query is issued. Until the query produces a row every accessor fails
//! with `Error::QueryNotExecuted`. The row is delivered once to the attached
//! `FrontEnd`, either when a dataset change makes the query match or never,
//! if the owner goes away, the dataset closes or `resolve_now` forces an
//! answer first.
//!
//! The pending state is the presence of the collection registration. Every
//! terminal path takes it out of its `RefCell` in one step, which both drops
//! the collection and removes the listener.

use crate::collection::Collection;
use crate::front_end::FrontEnd;
use crate::listener::{ListenerKey, ListenerToken};
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::RefCell;
use tarn_core::schema::Column;
use tarn_core::{DataType, Error, Result, RowId, Value};
use tarn_query::{SortDescriptor, TableQuery};
use tarn_row::{AccessMode, ResolvedRow, RowAccess};
use tarn_storage::Dataset;
use tracing::{debug, error, trace};

struct Registration {
    collection: Rc<Collection>,
    token: ListenerToken,
}

/// Placeholder for the first row matching a query.
pub struct PendingRow {
    /// `Some` while pending.
    registration: RefCell<Option<Registration>>,
    owner: RefCell<Option<Weak<dyn FrontEnd>>>,
    mode: AccessMode,
}

impl PendingRow {
    /// Starts waiting for the first row matching `query`.
    ///
    /// The query is not evaluated here.
    pub fn new(
        dataset: &Dataset,
        query: TableQuery,
        sort: Option<SortDescriptor>,
        mode: AccessMode,
    ) -> Rc<Self> {
        let collection = Collection::new(dataset, query, sort, None);
        let pending = Rc::new(Self {
            registration: RefCell::new(None),
            owner: RefCell::new(None),
            mode,
        });

        let weak = Rc::downgrade(&pending);
        let token = collection.add_listener(ListenerKey::of(&pending), move |_| {
            if let Some(pending) = weak.upgrade() {
                pending.on_collection_change();
            }
        });
        *pending.registration.borrow_mut() = Some(Registration { collection, token });
        pending
    }

    /// Sets the object that receives the resolved row.
    ///
    /// Only a weak reference is kept. Call once, before the row can resolve.
    pub fn attach_owner<T: FrontEnd + 'static>(&self, owner: &Rc<T>) {
        let weak: Weak<T> = Rc::downgrade(owner);
        let weak: Weak<dyn FrontEnd> = weak;
        *self.owner.borrow_mut() = Some(weak);
    }

    /// Returns true until the row resolves or is abandoned.
    pub fn is_pending(&self) -> bool {
        self.registration.borrow().is_some()
    }

    pub fn access_mode(&self) -> AccessMode {
        self.mode
    }

    /// Returns true once an owner has been attached, even if it has since
    /// been dropped.
    pub fn has_owner(&self) -> bool {
        self.owner.borrow().is_some()
    }

    /// Returns the live collection backing the row while it is pending.
    pub fn collection(&self) -> Option<Rc<Collection>> {
        self.registration
            .borrow()
            .as_ref()
            .map(|registration| registration.collection.clone())
    }

    /// Drops the collection and its listener. Returns false if already done.
    fn release(&self, reason: &'static str) -> bool {
        let registration = self.registration.borrow_mut().take();
        match registration {
            Some(Registration { collection, token }) => {
                collection.remove_listener(token);
                debug!(mode = %self.mode, reason, "released pending row");
                true
            }
            None => false,
        }
    }

    /// Handles a change of the backing collection.
    pub fn on_collection_change(&self) {
        let collection = match self.collection() {
            Some(collection) => collection,
            None => return,
        };

        let owner = self.owner.borrow().clone();
        let owner = match owner {
            Some(owner) => owner,
            None => {
                error!(
                    table = collection.query().table_name(),
                    "pending row notified before an owner was attached"
                );
                self.release("owner never attached");
                return;
            }
        };
        let owner = match owner.upgrade() {
            Some(owner) => owner,
            None => {
                self.release("owner dropped");
                return;
            }
        };

        if !collection.is_valid() {
            self.release("collection invalid");
            return;
        }

        match collection.first_unchecked_row() {
            None => {
                trace!(
                    table = collection.query().table_name(),
                    version = collection.dataset().version(),
                    "no matching row yet, staying armed"
                );
            }
            Some(row) => {
                let row = ResolvedRow::wrap(row, self.mode);
                self.release("resolved");
                debug!(mode = %self.mode, row = ?row.row_id(), "delivering resolved row");
                owner.on_query_finished(row);
            }
        }
    }

    /// Resolves the row immediately.
    ///
    /// Returns `ResolvedRow::Invalid` if nothing matches right now; the miss
    /// is final. The owner callback is not invoked.
    pub fn resolve_now(&self) -> Result<ResolvedRow> {
        let collection = self.collection().ok_or(Error::AlreadyResolved)?;
        if !self.has_owner() {
            return Err(Error::OwnerNotAttached);
        }

        let resolved = match collection.first_unchecked_row() {
            Some(row) => ResolvedRow::wrap(row, self.mode),
            None => ResolvedRow::invalid(),
        };
        self.release("forced");
        debug!(
            mode = %self.mode,
            row = ?resolved.row_id(),
            "forced pending row resolution"
        );
        Ok(resolved)
    }
}

impl RowAccess for PendingRow {
    fn table_name(&self) -> Result<String> {
        Err(Error::QueryNotExecuted)
    }

    fn index(&self) -> Result<RowId> {
        Err(Error::QueryNotExecuted)
    }

    fn is_attached(&self) -> bool {
        false
    }

    fn column_count(&self) -> Result<usize> {
        Err(Error::QueryNotExecuted)
    }

    fn column(&self, _column: usize) -> Result<Column> {
        Err(Error::QueryNotExecuted)
    }

    fn column_index(&self, _name: &str) -> Result<usize> {
        Err(Error::QueryNotExecuted)
    }

    fn read_cell(&self, _column: usize, _expected: Option<DataType>) -> Result<Value> {
        Err(Error::QueryNotExecuted)
    }

    fn write_cell(&self, _column: usize, _expected: Option<DataType>, _value: Value) -> Result<()> {
        Err(Error::QueryNotExecuted)
    }
}

impl core::fmt::Debug for PendingRow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PendingRow")
            .field("pending", &self.is_pending())
            .field("mode", &self.mode)
            .field("has_owner", &self.has_owner())
            .finish()
    }
}
