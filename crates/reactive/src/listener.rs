//! Change listener registry for live collections.
//!
//! Listeners are stored under a `ListenerToken` and tagged with the
//! `ListenerKey` of whoever registered them, so a caller can remove one
//! listener or every listener it owns.

use crate::collection::Collection;
use alloc::rc::Rc;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Callback invoked when a collection changes.
pub type ListenerCallback = Rc<dyn Fn(&Collection)>;

/// Opaque identity of a listener's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey(usize);

impl ListenerKey {
    /// Derives a key from the address of a shared value.
    pub fn of<T: ?Sized>(owner: &Rc<T>) -> Self {
        Self(Rc::as_ptr(owner) as *const () as usize)
    }

    /// Creates a key from a caller-chosen number.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }
}

/// Handle returned by `ListenerSet::insert`, used to remove the listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerToken(u64);

struct Listener {
    key: ListenerKey,
    callback: ListenerCallback,
}

/// Registered listeners of one collection.
pub struct ListenerSet {
    listeners: HashMap<ListenerToken, Listener>,
    /// Next token to assign; tokens grow with registration order.
    next_token: u64,
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerSet {
    /// Creates an empty listener set.
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_token: 1,
        }
    }

    /// Registers a listener and returns its token.
    pub fn insert(&mut self, key: ListenerKey, callback: ListenerCallback) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.listeners.insert(token, Listener { key, callback });
        token
    }

    /// Removes a listener. Returns true if it was registered.
    pub fn remove(&mut self, token: ListenerToken) -> bool {
        self.listeners.remove(&token).is_some()
    }

    /// Removes every listener registered under `key`, returning how many.
    pub fn remove_key(&mut self, key: ListenerKey) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|_, listener| listener.key != key);
        before - self.listeners.len()
    }

    #[inline]
    pub fn contains(&self, token: ListenerToken) -> bool {
        self.listeners.contains_key(&token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Returns the callbacks in registration order.
    ///
    /// Dispatch iterates the snapshot so callbacks may add or remove
    /// listeners while it runs.
    pub fn snapshot(&self) -> Vec<(ListenerToken, ListenerCallback)> {
        let mut entries: Vec<(ListenerToken, ListenerCallback)> = self
            .listeners
            .iter()
            .map(|(token, listener)| (*token, listener.callback.clone()))
            .collect();
        entries.sort_unstable_by_key(|(token, _)| *token);
        entries
    }
}
