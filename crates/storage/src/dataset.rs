//! Shared dataset handle.
//!
//! A `Dataset` is a cheap-to-clone handle to a set of tables. Every committed
//! write transaction advances the dataset version and notifies registered
//! observers. All state lives behind `Rc`/`RefCell`, so a dataset and
//! everything derived from it is bound to the thread that opened it.

use crate::config::DatasetConfig;
use crate::observer::{DatasetEvent, DatasetObserver, ObserverId, ObserverRegistry};
use crate::row_store::RowStore;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use tarn_core::schema::Table;
use tarn_core::{Error, Result, RowId, Value};
use tracing::{debug, trace};

type TableMap = BTreeMap<String, RowStore>;

#[derive(Default)]
struct DispatchQueue {
    active: bool,
    pending: VecDeque<DatasetEvent>,
}

struct DatasetInner {
    config: DatasetConfig,
    tables: RefCell<TableMap>,
    version: Cell<u64>,
    closed: Cell<bool>,
    /// Copy of the tables taken by `begin_write`; `Some` while a write is open.
    write_snapshot: RefCell<Option<TableMap>>,
    observers: RefCell<ObserverRegistry>,
    dispatch: RefCell<DispatchQueue>,
}

/// Handle to a live, versioned set of tables.
#[derive(Clone)]
pub struct Dataset {
    inner: Rc<DatasetInner>,
}

impl Dataset {
    /// Opens an empty dataset.
    pub fn open(config: DatasetConfig) -> Self {
        debug!(dataset = config.name(), "opened dataset");
        Self {
            inner: Rc::new(DatasetInner {
                config,
                tables: RefCell::new(BTreeMap::new()),
                version: Cell::new(0),
                closed: Cell::new(false),
                write_snapshot: RefCell::new(None),
                observers: RefCell::new(ObserverRegistry::new()),
                dispatch: RefCell::new(DispatchQueue::default()),
            }),
        }
    }

    /// Opens an empty writable dataset with the given name.
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self::open(DatasetConfig::new(name))
    }

    /// Returns the configuration the dataset was opened with.
    pub fn config(&self) -> &DatasetConfig {
        &self.inner.config
    }

    /// Returns the dataset name.
    pub fn name(&self) -> &str {
        self.inner.config.name()
    }

    /// Returns the current version. Starts at 0 and grows by one per commit.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Returns true if both handles refer to the same dataset.
    pub fn ptr_eq(&self, other: &Dataset) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::dataset_closed(self.name()))
        } else {
            Ok(())
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        self.ensure_open()?;
        if self.is_in_write_transaction() {
            Ok(())
        } else {
            Err(Error::NotInWriteTransaction)
        }
    }

    // ==================== Schema ====================

    /// Creates a table.
    pub fn create_table(&self, schema: Table) -> Result<()> {
        self.ensure_open()?;
        let name = schema.name().to_string();
        let mut tables = self.inner.tables.borrow_mut();
        if tables.contains_key(&name) {
            return Err(Error::invalid_schema(format!(
                "Table already exists: {}",
                name
            )));
        }
        debug!(dataset = self.name(), table = name.as_str(), "created table");
        tables.insert(name, RowStore::new(schema));
        Ok(())
    }

    /// Returns a copy of a table's schema.
    pub fn schema(&self, table: &str) -> Result<Table> {
        self.with_table(table, |store| store.schema().clone())
    }

    /// Returns true if the table exists in an open dataset.
    pub fn has_table(&self, table: &str) -> bool {
        !self.is_closed() && self.inner.tables.borrow().contains_key(table)
    }

    /// Returns all table names in ascending order.
    pub fn table_names(&self) -> Vec<String> {
        self.inner.tables.borrow().keys().cloned().collect()
    }

    /// Runs `f` against a table's rows.
    ///
    /// `f` must not write to this dataset.
    pub fn with_table<R>(&self, table: &str, f: impl FnOnce(&RowStore) -> R) -> Result<R> {
        self.ensure_open()?;
        let tables = self.inner.tables.borrow();
        let store = tables
            .get(table)
            .ok_or_else(|| Error::table_not_found(table))?;
        Ok(f(store))
    }

    fn with_table_mut<R>(
        &self,
        table: &str,
        f: impl FnOnce(&mut RowStore) -> Result<R>,
    ) -> Result<R> {
        self.ensure_writable()?;
        let mut tables = self.inner.tables.borrow_mut();
        let store = tables
            .get_mut(table)
            .ok_or_else(|| Error::table_not_found(table))?;
        f(store)
    }

    // ==================== Write transactions ====================

    /// Returns true while a write transaction is open.
    pub fn is_in_write_transaction(&self) -> bool {
        self.inner.write_snapshot.borrow().is_some()
    }

    /// Opens a write transaction.
    pub fn begin_write(&self) -> Result<()> {
        self.ensure_open()?;
        if self.inner.config.is_read_only() {
            return Err(Error::invalid_operation(format!(
                "Dataset {} is read-only",
                self.name()
            )));
        }
        if self.is_in_write_transaction() {
            return Err(Error::invalid_operation(
                "A write transaction is already open",
            ));
        }
        let snapshot = self.inner.tables.borrow().clone();
        *self.inner.write_snapshot.borrow_mut() = Some(snapshot);
        trace!(dataset = self.name(), "began write transaction");
        Ok(())
    }

    /// Commits the open write transaction and notifies observers.
    ///
    /// Returns the new version.
    pub fn commit_write(&self) -> Result<u64> {
        self.ensure_writable()?;
        self.inner.write_snapshot.borrow_mut().take();
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        debug!(dataset = self.name(), version, "committed write transaction");
        self.dispatch(DatasetEvent::Advanced { version });
        Ok(version)
    }

    /// Discards the open write transaction, restoring the tables.
    pub fn cancel_write(&self) -> Result<()> {
        self.ensure_writable()?;
        if let Some(snapshot) = self.inner.write_snapshot.borrow_mut().take() {
            *self.inner.tables.borrow_mut() = snapshot;
        }
        trace!(dataset = self.name(), "cancelled write transaction");
        Ok(())
    }

    /// Runs `f` inside a write transaction, committing on success and
    /// cancelling on error.
    pub fn write<T>(&self, f: impl FnOnce(&Dataset) -> Result<T>) -> Result<T> {
        self.begin_write()?;
        match f(self) {
            Ok(value) => {
                self.commit_write()?;
                Ok(value)
            }
            Err(err) => {
                if self.is_in_write_transaction() {
                    self.cancel_write()?;
                }
                Err(err)
            }
        }
    }

    // ==================== Rows ====================

    /// Inserts a row. Requires a write transaction.
    pub fn insert(&self, table: &str, values: Vec<Value>) -> Result<RowId> {
        self.with_table_mut(table, |store| store.insert(values))
    }

    /// Inserts a row of default values. Requires a write transaction.
    pub fn insert_default(&self, table: &str) -> Result<RowId> {
        self.with_table_mut(table, |store| Ok(store.insert_default()))
    }

    /// Deletes a row and clears every link pointing at it.
    /// Requires a write transaction.
    pub fn delete(&self, table: &str, row_id: RowId) -> Result<()> {
        self.with_table_mut(table, |store| store.delete(row_id).map(|_| ()))?;
        let mut tables = self.inner.tables.borrow_mut();
        for store in tables.values_mut() {
            store.unlink(table, row_id);
        }
        Ok(())
    }

    /// Writes one cell without schema validation. Requires a write transaction.
    pub fn set_value(&self, table: &str, row_id: RowId, column: usize, value: Value) -> Result<()> {
        self.with_table_mut(table, |store| store.set_cell(row_id, column, value))
    }

    /// Reads one cell.
    pub fn get_value(&self, table: &str, row_id: RowId, column: usize) -> Result<Value> {
        self.with_table(table, |store| store.get_cell(row_id, column).cloned())?
    }

    /// Returns true if the row exists in an open dataset.
    pub fn contains_row(&self, table: &str, row_id: RowId) -> bool {
        self.with_table(table, |store| store.contains(row_id))
            .unwrap_or(false)
    }

    // ==================== Lifecycle ====================

    /// Closes the dataset, dropping all table data.
    ///
    /// Observers receive `DatasetEvent::Closed` once. Closing twice is a no-op.
    pub fn close(&self) {
        if self.inner.closed.replace(true) {
            return;
        }
        self.inner.write_snapshot.borrow_mut().take();
        self.inner.tables.borrow_mut().clear();
        debug!(dataset = self.name(), version = self.version(), "closed dataset");
        self.dispatch(DatasetEvent::Closed);
    }

    // ==================== Observers ====================

    /// Registers an observer. The registry holds it weakly.
    pub fn register_observer(&self, observer: Weak<dyn DatasetObserver>) -> ObserverId {
        self.inner.observers.borrow_mut().register(observer)
    }

    /// Unregisters an observer. Returns true if it was registered.
    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.inner.observers.borrow_mut().unregister(id)
    }

    /// Returns the number of live registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    fn next_event(&self) -> Option<DatasetEvent> {
        self.inner.dispatch.borrow_mut().pending.pop_front()
    }

    /// Delivers `event`, or queues it behind the event currently being
    /// delivered.
    fn dispatch(&self, event: DatasetEvent) {
        {
            let mut queue = self.inner.dispatch.borrow_mut();
            queue.pending.push_back(event);
            if queue.active {
                return;
            }
            queue.active = true;
        }

        while let Some(event) = self.next_event() {
            let observers = self.inner.observers.borrow_mut().snapshot();
            trace!(
                dataset = self.name(),
                ?event,
                observers = observers.len(),
                "dispatching dataset event"
            );
            for (id, observer) in observers {
                // An earlier observer may have unregistered this one.
                if self.inner.observers.borrow().contains(id) {
                    observer.on_dataset_event(event);
                }
            }
        }

        self.inner.dispatch.borrow_mut().active = false;
    }
}

impl core::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name())
            .field("version", &self.version())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use tarn_core::schema::TableBuilder;
    use tarn_core::DataType;

    fn open_people() -> Dataset {
        let dataset = Dataset::in_memory("test");
        let schema = TableBuilder::new("people")
            .unwrap()
            .add_column("name", DataType::String)
            .unwrap()
            .add_column("age", DataType::Int64)
            .unwrap()
            .add_link("friend", "people")
            .unwrap()
            .build()
            .unwrap();
        dataset.create_table(schema).unwrap();
        dataset
    }

    fn person(name: &str, age: i64) -> Vec<Value> {
        vec![Value::String(name.into()), Value::Int64(age), Value::Null]
    }

    struct Recorder {
        events: RefCell<Vec<DatasetEvent>>,
    }

    impl DatasetObserver for Recorder {
        fn on_dataset_event(&self, event: DatasetEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    fn recorder(dataset: &Dataset) -> (Rc<Recorder>, ObserverId) {
        let observer = Rc::new(Recorder {
            events: RefCell::new(Vec::new()),
        });
        let weak: Weak<Recorder> = Rc::downgrade(&observer);
        let id = dataset.register_observer(weak);
        (observer, id)
    }

    #[test]
    fn test_commit_advances_version() {
        let dataset = open_people();
        assert_eq!(dataset.version(), 0);

        let id = dataset
            .write(|ds| ds.insert("people", person("Alice", 31)))
            .unwrap();

        assert_eq!(dataset.version(), 1);
        assert_eq!(
            dataset.get_value("people", id, 0).unwrap(),
            Value::String("Alice".into())
        );
    }

    #[test]
    fn test_mutation_requires_write_transaction() {
        let dataset = open_people();
        assert_eq!(
            dataset.insert("people", person("Alice", 31)),
            Err(Error::NotInWriteTransaction)
        );
        assert_eq!(dataset.commit_write(), Err(Error::NotInWriteTransaction));
    }

    #[test]
    fn test_nested_write_rejected() {
        let dataset = open_people();
        dataset.begin_write().unwrap();
        assert!(matches!(
            dataset.begin_write(),
            Err(Error::InvalidOperation { .. })
        ));
        dataset.cancel_write().unwrap();
        assert!(!dataset.is_in_write_transaction());
    }

    #[test]
    fn test_cancel_restores_tables() {
        let dataset = open_people();
        dataset.begin_write().unwrap();
        dataset.insert("people", person("Alice", 31)).unwrap();
        dataset.cancel_write().unwrap();

        assert_eq!(dataset.with_table("people", |t| t.len()).unwrap(), 0);
        assert_eq!(dataset.version(), 0);
    }

    #[test]
    fn test_write_error_rolls_back() {
        let dataset = open_people();
        let result: Result<()> = dataset.write(|ds| {
            ds.insert("people", person("Alice", 31))?;
            ds.insert("people", vec![Value::Int64(1)])?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(dataset.with_table("people", |t| t.len()).unwrap(), 0);
        assert_eq!(dataset.version(), 0);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let dataset = Dataset::open(DatasetConfig::new("ro").read_only(true));
        assert!(matches!(
            dataset.begin_write(),
            Err(Error::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_delete_clears_links() {
        let dataset = open_people();
        let (alice, bob) = dataset
            .write(|ds| {
                let alice = ds.insert("people", person("Alice", 31))?;
                let bob = ds.insert("people", person("Bob", 25))?;
                ds.set_value("people", bob, 2, Value::Link(alice))?;
                Ok((alice, bob))
            })
            .unwrap();

        dataset.write(|ds| ds.delete("people", alice)).unwrap();

        assert!(!dataset.contains_row("people", alice));
        assert_eq!(dataset.get_value("people", bob, 2).unwrap(), Value::Null);
    }

    #[test]
    fn test_observers_receive_events_in_order() {
        let dataset = open_people();
        let (observer, _) = recorder(&dataset);

        dataset.write(|ds| ds.insert("people", person("A", 1))).unwrap();
        dataset.write(|ds| ds.insert("people", person("B", 2))).unwrap();
        dataset.close();
        dataset.close();

        assert_eq!(
            *observer.events.borrow(),
            vec![
                DatasetEvent::Advanced { version: 1 },
                DatasetEvent::Advanced { version: 2 },
                DatasetEvent::Closed,
            ]
        );
    }

    #[test]
    fn test_unregistered_observer_not_notified() {
        let dataset = open_people();
        let (observer, id) = recorder(&dataset);
        assert!(dataset.unregister_observer(id));

        dataset.write(|ds| ds.insert("people", person("A", 1))).unwrap();
        assert!(observer.events.borrow().is_empty());
    }

    #[test]
    fn test_dropped_observer_pruned() {
        let dataset = open_people();
        {
            let _ = recorder(&dataset);
        }
        assert_eq!(dataset.observer_count(), 0);
        dataset.write(|ds| ds.insert("people", person("A", 1))).unwrap();
    }

    /// Commits from inside a callback once, to check re-entrant dispatch.
    struct Committer {
        dataset: Dataset,
        seen: RefCell<Vec<u64>>,
    }

    impl DatasetObserver for Committer {
        fn on_dataset_event(&self, event: DatasetEvent) {
            if let DatasetEvent::Advanced { version } = event {
                self.seen.borrow_mut().push(version);
                if version == 1 {
                    self.dataset
                        .write(|ds| ds.insert("people", person("Nested", 2)))
                        .unwrap();
                    // The nested event is queued, not delivered re-entrantly.
                    assert_eq!(*self.seen.borrow(), vec![1]);
                }
            }
        }
    }

    #[test]
    fn test_reentrant_commit_is_queued() {
        let dataset = open_people();
        let committer = Rc::new(Committer {
            dataset: dataset.clone(),
            seen: RefCell::new(Vec::new()),
        });
        let weak: Weak<Committer> = Rc::downgrade(&committer);
        dataset.register_observer(weak);

        dataset.write(|ds| ds.insert("people", person("A", 1))).unwrap();

        assert_eq!(*committer.seen.borrow(), vec![1, 2]);
        assert_eq!(dataset.version(), 2);
    }

    #[test]
    fn test_table_names_sorted() {
        let dataset = open_people();
        let dogs = TableBuilder::new("dogs")
            .unwrap()
            .add_column("name", DataType::String)
            .unwrap()
            .build()
            .unwrap();
        dataset.create_table(dogs).unwrap();
        assert_eq!(dataset.table_names(), vec!["dogs", "people"]);

        dataset.close();
        assert!(dataset.table_names().is_empty());
    }

    #[test]
    fn test_closed_dataset_rejects_access() {
        let dataset = open_people();
        dataset.close();
        assert!(dataset.is_closed());
        assert!(matches!(
            dataset.schema("people"),
            Err(Error::DatasetClosed { .. })
        ));
        assert!(!dataset.has_table("people"));
        assert!(matches!(
            dataset.begin_write(),
            Err(Error::DatasetClosed { .. })
        ));
    }
}
