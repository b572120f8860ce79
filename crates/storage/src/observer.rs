//! Dataset observer registry.
//!
//! Observers are held weakly: registering never keeps an observer alive, and
//! entries whose observer has been dropped are pruned on the next dispatch.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

/// Unique identifier for a registered observer.
pub type ObserverId = u64;

/// An event raised by a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetEvent {
    /// A write transaction committed and the dataset moved to `version`.
    Advanced { version: u64 },
    /// The dataset was closed. Raised once; no events follow it.
    Closed,
}

/// Receives dataset events.
///
/// Events are delivered one at a time, in the order they were raised. An
/// observer may commit or close the dataset from inside the callback; the
/// resulting event is queued behind the current one.
pub trait DatasetObserver {
    fn on_dataset_event(&self, event: DatasetEvent);
}

/// Tracks the observers of one dataset.
pub struct ObserverRegistry {
    observers: Vec<(ObserverId, Weak<dyn DatasetObserver>)>,
    next_id: ObserverId,
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers an observer and returns its ID.
    pub fn register(&mut self, observer: Weak<dyn DatasetObserver>) -> ObserverId {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Unregisters an observer by ID.
    ///
    /// Returns true if the observer was found and removed.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() < before
    }

    /// Returns true if `id` is still registered.
    pub fn contains(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|(observer_id, _)| *observer_id == id)
    }

    /// Returns the number of registered observers that are still alive.
    pub fn len(&self) -> usize {
        self.observers
            .iter()
            .filter(|(_, w)| w.strong_count() > 0)
            .count()
    }

    /// Returns true if no live observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes entries whose observer has been dropped.
    pub fn cleanup(&mut self) {
        self.observers.retain(|(_, w)| w.strong_count() > 0);
    }

    /// Prunes dropped observers and returns strong handles to the rest,
    /// in registration order.
    pub fn snapshot(&mut self) -> Vec<(ObserverId, Rc<dyn DatasetObserver>)> {
        self.cleanup();
        self.observers
            .iter()
            .filter_map(|(id, w)| w.upgrade().map(|o| (*id, o)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;

    struct Recorder {
        events: RefCell<Vec<DatasetEvent>>,
    }

    impl Recorder {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                events: RefCell::new(Vec::new()),
            })
        }
    }

    impl DatasetObserver for Recorder {
        fn on_dataset_event(&self, event: DatasetEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    fn weak(observer: &Rc<Recorder>) -> Weak<dyn DatasetObserver> {
        let weak: Weak<Recorder> = Rc::downgrade(observer);
        weak
    }

    #[test]
    fn test_register_assigns_ids() {
        let mut registry = ObserverRegistry::new();
        let a = Recorder::new();
        let b = Recorder::new();

        assert_eq!(registry.register(weak(&a)), 1);
        assert_eq!(registry.register(weak(&b)), 2);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(1));
    }

    #[test]
    fn test_unregister() {
        let mut registry = ObserverRegistry::new();
        let a = Recorder::new();
        let id = registry.register(weak(&a));

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_prunes_dropped() {
        let mut registry = ObserverRegistry::new();
        let a = Recorder::new();
        {
            let b = Recorder::new();
            registry.register(weak(&b));
        }
        registry.register(weak(&a));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, 2);
        assert!(!registry.contains(1));

        snapshot[0].1.on_dataset_event(DatasetEvent::Advanced { version: 3 });
        assert_eq!(
            *a.events.borrow(),
            vec![DatasetEvent::Advanced { version: 3 }]
        );
    }

    #[test]
    fn test_registration_does_not_keep_alive() {
        let mut registry = ObserverRegistry::new();
        let a = Recorder::new();
        registry.register(weak(&a));
        assert_eq!(Rc::strong_count(&a), 1);
        drop(a);
        assert_eq!(registry.len(), 0);
    }
}
