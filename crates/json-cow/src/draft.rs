//! Imperative-looking edits that produce a new immutable tree.
//!
//! A [`Draft`] is a path into a [`Transaction`]'s working copy. Reads resolve
//! against the working copy; writes are routed through the transaction, which
//! clones every container on the written path exactly once. Nothing is cloned
//! on read, so a producer that only inspects the tree costs one shallow clone
//! of the root.
//!
//! ```
//! use json_cow::{apply_producer, Value};
//! use serde_json::json;
//!
//! let base = Value::from(json!({"todos": [{"done": false}]}));
//! let next = apply_producer(&base, |draft| {
//!     draft.child("todos")?.child(0)?.set("done", true)?;
//!     draft.set("count", 1)
//! })
//! .unwrap();
//!
//! assert_eq!(next.to_json(), json!({"todos": [{"done": true}], "count": 1}));
//! assert_eq!(base.to_json(), json!({"todos": [{"done": false}]}));
//! ```

use json_cow_path::{Path, Seg};
use tracing::trace;

use crate::error::{CowError, CowResult};
use crate::rewrite::Transaction;
use crate::shape::{validate, Shape};
use crate::value::Value;

/// A mutable view of one location inside a transaction.
///
/// Values returned by [`Draft::current`] and [`Draft::get`] may be shared with
/// the producer's input; edit through the draft, not through those handles.
pub struct Draft<'t> {
    txn: &'t mut Transaction,
    path: Path,
}

impl<'t> Draft<'t> {
    /// A draft of the transaction's working root.
    pub fn new(txn: &'t mut Transaction) -> Self {
        Draft {
            txn,
            path: Path::root(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The value this draft addresses in the working copy.
    pub fn current(&self) -> Value {
        self.txn.read(&self.path)
    }

    pub fn get(&self, seg: impl Into<Seg>) -> Value {
        self.txn.read(&self.path.with_segment(seg.into()))
    }

    /// A nested draft for a container child.
    pub fn child(&mut self, seg: impl Into<Seg>) -> CowResult<Draft<'_>> {
        let path = self.path.with_segment(seg.into());
        if !self.txn.read(&path).is_container() {
            return Err(CowError::not_a_container(path));
        }
        Ok(Draft {
            txn: &mut *self.txn,
            path,
        })
    }

    pub fn set(&mut self, seg: impl Into<Seg>, value: impl Into<Value>) -> CowResult<()> {
        let path = self.path.with_segment(seg.into());
        self.txn.write(&path, value.into())
    }

    /// Replace the value this draft addresses.
    pub fn replace(&mut self, value: impl Into<Value>) -> CowResult<()> {
        self.txn.write(&self.path, value.into())
    }

    pub fn delete(&mut self, seg: impl Into<Seg>) -> CowResult<Option<Value>> {
        let path = self.path.with_segment(seg.into());
        self.txn.delete(&path)
    }

    /// Append to the array this draft addresses.
    pub fn push(&mut self, value: impl Into<Value>) -> CowResult<()> {
        let index = match self.current() {
            Value::Array(a) => a.len(),
            _ => return Err(CowError::not_a_container(self.path.clone())),
        };
        let path = self.path.with_segment(Seg::Index(index));
        self.txn.write(&path, value.into())
    }

    /// Number of entries (objects) or elements (arrays); zero otherwise.
    pub fn len(&self) -> usize {
        match self.current() {
            Value::Object(o) => o.len(),
            Value::Array(a) => a.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Object keys in order, or every index of an array.
    pub fn keys(&self) -> Vec<Seg> {
        match self.current() {
            Value::Object(o) => o.keys().into_iter().map(Seg::Key).collect(),
            Value::Array(a) => (0..a.len()).map(Seg::Index).collect(),
            _ => Vec::new(),
        }
    }
}

/// Run `producer` against a draft of `base` and return the resulting tree.
///
/// `base` is never mutated. The result shares every subtree the producer did
/// not write beneath. `null`, `undefined` and host values are rejected. If the
/// producer fails its error is returned and the working copy is discarded.
pub fn apply_producer<F>(base: &Value, producer: F) -> CowResult<Value>
where
    F: FnOnce(&mut Draft<'_>) -> CowResult<()>,
{
    if validate(base)? == Shape::Nullish {
        return Err(CowError::shape_rejected(base.type_name()));
    }
    let mut txn = Transaction::begin(base);
    trace!(kind = base.type_name(), "producer started");
    producer(&mut Draft::new(&mut txn))?;
    Ok(txn.commit())
}
