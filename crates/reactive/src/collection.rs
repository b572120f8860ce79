//! Live query collections.
//!
//! A `Collection` keeps the result of a `TableQuery` (optionally sorted) in
//! step with a dataset. It observes the dataset weakly; each committed write
//! re-evaluates the query and then fires the collection's listeners. When the
//! dataset closes the listeners fire once more and `is_valid` turns false.

use crate::listener::{ListenerKey, ListenerSet, ListenerToken};
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use tarn_core::{Result, RowId};
use tarn_query::{SortDescriptor, TableQuery};
use tarn_row::UncheckedRow;
use tarn_storage::{Dataset, DatasetEvent, DatasetObserver, ObserverId};
use tracing::{debug, trace};

/// Result rows of a query against a live dataset.
pub struct Collection {
    dataset: Dataset,
    query: TableQuery,
    sort: Option<SortDescriptor>,
    /// Matching row ids as of `version`.
    rows: RefCell<Vec<RowId>>,
    /// Dataset version `rows` was computed at; `None` until first evaluated.
    version: Cell<Option<u64>>,
    observer_id: Cell<Option<ObserverId>>,
    listeners: RefCell<ListenerSet>,
}

impl Collection {
    /// Creates a collection and starts observing the dataset.
    ///
    /// With `initial_results` the collection starts from those row ids at
    /// the dataset's current version. Without them the query is evaluated
    /// lazily on first access.
    pub fn new(
        dataset: &Dataset,
        query: TableQuery,
        sort: Option<SortDescriptor>,
        initial_results: Option<Vec<RowId>>,
    ) -> Rc<Self> {
        let version = initial_results.as_ref().map(|_| dataset.version());
        let collection = Rc::new(Self {
            dataset: dataset.clone(),
            query,
            sort,
            rows: RefCell::new(initial_results.unwrap_or_default()),
            version: Cell::new(version),
            observer_id: Cell::new(None),
            listeners: RefCell::new(ListenerSet::new()),
        });

        let weak: Weak<Collection> = Rc::downgrade(&collection);
        let id = dataset.register_observer(weak);
        collection.observer_id.set(Some(id));
        trace!(
            dataset = dataset.name(),
            table = collection.query.table_name(),
            observer = id,
            "created collection"
        );
        collection
    }

    /// Returns the dataset the collection observes.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    pub fn sort(&self) -> Option<&SortDescriptor> {
        self.sort.as_ref()
    }

    /// Returns true while the dataset is open and the queried table exists.
    pub fn is_valid(&self) -> bool {
        self.dataset.has_table(self.query.table_name())
    }

    /// Returns the dataset version the current results belong to.
    pub fn snapshot_version(&self) -> Option<u64> {
        self.version.get()
    }

    fn evaluate(&self) -> Result<Vec<RowId>> {
        self.dataset.with_table(self.query.table_name(), |store| {
            let mut ids = self.query.find_all(store);
            if let Some(sort) = &self.sort {
                sort.sort(store, &mut ids);
            }
            ids
        })
    }

    /// Re-evaluates the query if the dataset moved past the snapshot.
    fn refresh(&self) {
        let version = self.dataset.version();
        if self.version.get() == Some(version) {
            return;
        }
        match self.evaluate() {
            Ok(ids) => {
                trace!(
                    table = self.query.table_name(),
                    version,
                    rows = ids.len(),
                    "refreshed collection"
                );
                *self.rows.borrow_mut() = ids;
                self.version.set(Some(version));
            }
            Err(err) => {
                debug!(table = self.query.table_name(), %err, "collection evaluation failed");
                self.rows.borrow_mut().clear();
            }
        }
    }

    /// Returns the first matching row right now, if any.
    pub fn first_unchecked_row(&self) -> Option<UncheckedRow> {
        if !self.is_valid() {
            return None;
        }
        self.refresh();
        let first = self.rows.borrow().first().copied()?;
        Some(UncheckedRow::new(
            self.dataset.clone(),
            self.query.table_name(),
            first,
        ))
    }

    /// Returns the matching row ids right now.
    pub fn row_ids(&self) -> Vec<RowId> {
        if !self.is_valid() {
            return Vec::new();
        }
        self.refresh();
        self.rows.borrow().clone()
    }

    /// Returns the number of matching rows right now.
    pub fn len(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        self.refresh();
        self.rows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a change listener.
    pub fn add_listener<F>(&self, key: ListenerKey, callback: F) -> ListenerToken
    where
        F: Fn(&Collection) + 'static,
    {
        self.listeners.borrow_mut().insert(key, Rc::new(callback))
    }

    /// Removes a listener. A listener removed during dispatch is not called
    /// for the rest of that dispatch.
    pub fn remove_listener(&self, token: ListenerToken) -> bool {
        self.listeners.borrow_mut().remove(token)
    }

    /// Removes every listener registered under `key`.
    pub fn remove_listeners_for(&self, key: ListenerKey) -> usize {
        self.listeners.borrow_mut().remove_key(key)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify_listeners(&self) {
        let listeners = self.listeners.borrow().snapshot();
        trace!(
            table = self.query.table_name(),
            listeners = listeners.len(),
            "notifying collection listeners"
        );
        for (token, callback) in listeners {
            if self.listeners.borrow().contains(token) {
                callback(self);
            }
        }
    }
}

impl DatasetObserver for Collection {
    fn on_dataset_event(&self, event: DatasetEvent) {
        match event {
            DatasetEvent::Advanced { .. } => self.refresh(),
            DatasetEvent::Closed => {
                self.rows.borrow_mut().clear();
                self.version.set(None);
            }
        }
        self.notify_listeners();
    }
}

impl Drop for Collection {
    fn drop(&mut self) {
        if let Some(id) = self.observer_id.take() {
            self.dataset.unregister_observer(id);
        }
    }
}

impl core::fmt::Debug for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collection")
            .field("table", &self.query.table_name())
            .field("version", &self.version.get())
            .field("rows", &self.rows.borrow().len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
