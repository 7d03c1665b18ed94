//! The shared cell that holds the current tree and its listeners.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use json_cow_path::Path;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::debug;

use crate::freeze::deep_freeze;
use crate::options::QueryOptions;
use crate::value::Value;

/// What produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Update,
}

/// Notification delivered to listeners after a write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    /// Dotted path of the write; empty for the root.
    pub path: String,
    #[serde(rename = "from")]
    pub source: ChangeSource,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// The new root.
    pub value: Value,
}

pub type Listener = Arc<dyn Fn(&[ChangeRecord]) + Send + Sync>;

struct RootInner {
    value: RwLock<Value>,
    listeners: Mutex<BTreeMap<u64, Listener>>,
    next_id: AtomicU64,
    options: QueryOptions,
}

/// Owner of the canonical current tree. Cloning the handle shares the root.
#[derive(Clone)]
pub struct RootHandle(Arc<RootInner>);

impl RootHandle {
    /// The initial value is stored as is; it is not frozen.
    pub fn new(value: Value, options: QueryOptions) -> Self {
        RootHandle(Arc::new(RootInner {
            value: RwLock::new(value),
            listeners: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            options,
        }))
    }

    pub fn get(&self) -> Value {
        self.0.value.read().clone()
    }

    pub fn options(&self) -> QueryOptions {
        self.0.options
    }

    /// Returns true if both handles share one root.
    pub fn ptr_eq(a: &RootHandle, b: &RootHandle) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Store `value` as the new root, freeze it when enabled and notify every
    /// listener in subscription order. `path` is the location that was
    /// written.
    pub fn install(&self, path: &Path, value: Value) -> Value {
        let frozen = if self.0.options.deep_freeze {
            deep_freeze(&value)
        } else {
            0
        };
        *self.0.value.write() = value.clone();
        let listeners: Vec<Listener> = self.0.listeners.lock().values().cloned().collect();
        debug!(path = %path, listeners = listeners.len(), frozen, "installed new root");
        if !listeners.is_empty() {
            let records = [ChangeRecord {
                path: path.to_dotted(),
                source: ChangeSource::Set,
                kind: ChangeKind::Update,
                value: value.clone(),
            }];
            for listener in listeners {
                listener(&records[..]);
            }
        }
        value
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[ChangeRecord]) + Send + Sync + 'static,
    {
        let id = self.0.next_id.fetch_add(1, Ordering::Relaxed);
        self.0.listeners.lock().insert(id, Arc::new(listener));
        Subscription {
            id,
            root: Arc::downgrade(&self.0),
        }
    }

    pub fn unsubscribe(&self, id: u64) -> bool {
        self.0.listeners.lock().remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.lock().len()
    }
}

impl fmt::Debug for RootHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootHandle")
            .field("value", &self.get())
            .field("listeners", &self.listener_count())
            .field("options", &self.0.options)
            .finish()
    }
}

/// A registered listener. Dropping the subscription keeps the listener
/// registered; call [`Subscription::unsubscribe`] to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    root: Weak<RootInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener. Returns false if it was already removed or the
    /// root is gone.
    pub fn unsubscribe(&self) -> bool {
        match self.root.upgrade() {
            Some(inner) => inner.listeners.lock().remove(&self.id).is_some(),
            None => false,
        }
    }
}
