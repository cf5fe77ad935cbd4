//! Per-task lifecycle listeners.
//!
//! A task keeps one callback list; each entry is registered for a single
//! [`TaskEventKind`]. Settlement drains the whole list, so every listener
//! fires at most once and none outlives the terminal transition.
//!
//! Callbacks run **after** the task's state lock is released; they may read
//! the task or call into other tasks freely.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use parking_lot::Mutex;

use super::{Task, TaskEventKind};

/// Callback invoked with the task that settled.
pub type Listener<T> = Arc<dyn Fn(&Task<T>) + Send + Sync>;

/// Handle returned by [`Task::add_listener`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry<T> {
    id: ListenerId,
    kind: TaskEventKind,
    listener: Listener<T>,
}

pub(crate) struct Listeners<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry<T>>>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn allocate(&self) -> ListenerId {
        ListenerId(self.next_id.fetch_add(1, AtomicOrdering::Relaxed))
    }

    pub(crate) fn insert(&self, id: ListenerId, kind: TaskEventKind, listener: Listener<T>) {
        self.entries.lock().push(Entry { id, kind, listener });
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Drops every listener scoped to the task's signal (fulfill/reject).
    pub(crate) fn detach_signal_scoped(&self) -> Vec<Listener<T>> {
        let mut entries = self.entries.lock();
        let (detached, kept): (Vec<_>, Vec<_>) = entries
            .drain(..)
            .partition(|e| e.kind.scoped_to_signal());
        *entries = kept;
        // Returned so the closures are dropped by the caller, outside the lock.
        detached.into_iter().map(|e| e.listener).collect()
    }

    /// Drains the list and invokes the listeners registered for `kind`.
    pub(crate) fn notify(&self, kind: TaskEventKind, task: &Task<T>) {
        let drained = std::mem::take(&mut *self.entries.lock());
        for entry in drained.into_iter().filter(|e| e.kind == kind) {
            (entry.listener)(task);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
