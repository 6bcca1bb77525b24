//! Observer Module
//!
//! Registry of callbacks notified when entries are removed or updated.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Callback receiving the affected key.
pub type KeyCallback = Arc<dyn Fn(&str) + Send + Sync>;

// == Observer List ==
/// Ordered list of callbacks for one kind of event.
#[derive(Default)]
pub(crate) struct ObserverList {
    callbacks: RwLock<Vec<KeyCallback>>,
}

impl ObserverList {
    // == Register ==
    pub(crate) fn register(&self, callback: KeyCallback) {
        self.callbacks.write().push(callback);
    }

    // == Notify ==
    /// Invokes every callback in registration order.
    ///
    /// The list is copied first so a callback may register further
    /// observers without deadlocking.
    pub(crate) fn notify(&self, key: &str) {
        let callbacks = self.callbacks.read().clone();
        for callback in &callbacks {
            callback(key);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.read().len()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.len())
            .finish()
    }
}

// == Observers ==
/// Removal and update observers of a cache store.
#[derive(Debug, Default)]
pub(crate) struct Observers {
    pub(crate) removed: ObserverList,
    pub(crate) updated: ObserverList,
}

/// A notification queued while the entry table is locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notification {
    Removed(String),
    Updated(String),
}

impl Observers {
    // == Dispatch ==
    /// Delivers queued notifications in order.
    pub(crate) fn dispatch(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            match notification {
                Notification::Removed(key) => self.removed.notify(&key),
                Notification::Updated(key) => self.updated.notify(&key),
            }
        }
    }
}
