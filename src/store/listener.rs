//! Live query subscriptions on top of a polling revision check.
//!
//! `subscribe` delivers the current result set right away. Afterwards every
//! `poll` compares the store revision with the one each listener last saw
//! and, when it moved, re-runs the query and delivers the new result only if
//! it differs from the previous one. Dropping the returned handle removes
//! the listener.

use super::{Document, DocumentStore, Query};
use crate::errors::AppResult;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub docs: Vec<Document>,
    pub revision: i64,
}

type Callback = Box<dyn FnMut(&Snapshot)>;

struct Listener {
    id: u64,
    query: Query,
    callback: Callback,
    seen_revision: i64,
    last_docs: Vec<Document>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
    /// Ids dropped while their listener was out for dispatch.
    removed: HashSet<u64>,
    dispatching: bool,
}

impl Registry {
    fn remove(&mut self, id: u64) {
        self.listeners.retain(|l| l.id != id);
        if self.dispatching {
            self.removed.insert(id);
        }
    }
}

#[derive(Default, Clone)]
pub struct SnapshotHub {
    registry: Rc<RefCell<Registry>>,
}

/// Keeps a subscription alive. Dropping it unsubscribes.
pub struct ListenerHandle {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl ListenerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn unsubscribe(self) {}
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(reg) = self.registry.upgrade() {
            reg.borrow_mut().remove(self.id);
            tracing::debug!(listener = self.id, "listener removed");
        }
    }
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Register `callback` for `query` and deliver the initial snapshot.
    pub fn subscribe<F>(
        &self,
        store: &dyn DocumentStore,
        query: Query,
        mut callback: F,
    ) -> AppResult<ListenerHandle>
    where
        F: FnMut(&Snapshot) + 'static,
    {
        let revision = store.revision()?;
        let docs = store.query(&query)?;

        let snapshot = Snapshot { docs, revision };
        callback(&snapshot);

        let mut reg = self.registry.borrow_mut();
        reg.next_id += 1;
        let id = reg.next_id;
        reg.listeners.push(Listener {
            id,
            query,
            callback: Box::new(callback),
            seen_revision: revision,
            last_docs: snapshot.docs,
        });

        tracing::debug!(listener = id, revision, "listener attached");

        Ok(ListenerHandle {
            id,
            registry: Rc::downgrade(&self.registry),
        })
    }

    /// Check for changes and deliver new snapshots.
    /// Returns how many listeners received one.
    pub fn poll(&self, store: &dyn DocumentStore) -> AppResult<usize> {
        let revision = store.revision()?;

        let mut batch = {
            let mut reg = self.registry.borrow_mut();
            reg.dispatching = true;
            std::mem::take(&mut reg.listeners)
        };

        let mut delivered = 0;
        let mut failure = None;

        for l in batch.iter_mut() {
            if self.registry.borrow().removed.contains(&l.id) {
                continue;
            }
            if l.seen_revision == revision {
                continue;
            }

            // a failed query leaves the listener stale so the next poll retries
            let docs = match store.query(&l.query) {
                Ok(d) => d,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };
            l.seen_revision = revision;
            if docs == l.last_docs {
                continue;
            }

            let snapshot = Snapshot { docs, revision };
            (l.callback)(&snapshot);
            l.last_docs = snapshot.docs;
            delivered += 1;
        }

        let mut reg = self.registry.borrow_mut();
        let removed = std::mem::take(&mut reg.removed);
        batch.retain(|l| !removed.contains(&l.id));
        // listeners attached during dispatch go after the existing ones
        let added = std::mem::take(&mut reg.listeners);
        batch.extend(added);
        reg.listeners = batch;
        reg.dispatching = false;
        drop(reg);

        match failure {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }
}
