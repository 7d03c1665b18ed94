//! Shared container handles.
//!
//! [`Object`] and [`Array`] are reference-counted handles: cloning a handle
//! shares the container, and [`Object::ptr_eq`] / [`Array::ptr_eq`] answer
//! whether two handles are the same container. Structural sharing between
//! tree versions is expressed entirely through these handles.
//!
//! Each container carries a frozen flag. Once set, every mutator returns
//! [`CowError::Frozen`] and leaves the contents unchanged. Locks are only held
//! for the duration of a single accessor call; accessors hand out handle
//! clones, never guards.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::Value;
use crate::error::{CowError, CowResult};

struct Node<T> {
    frozen: AtomicBool,
    data: RwLock<T>,
}

impl<T> Node<T> {
    fn new(data: T) -> Self {
        Node {
            frozen: AtomicBool::new(false),
            data: RwLock::new(data),
        }
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Returns true if this call set the flag.
    fn freeze(&self) -> bool {
        let _guard = self.data.write();
        !self.frozen.swap(true, Ordering::AcqRel)
    }

    fn mutate<R>(&self, kind: &'static str, f: impl FnOnce(&mut T) -> R) -> CowResult<R> {
        let mut data = self.data.write();
        if self.is_frozen() {
            return Err(CowError::Frozen { kind });
        }
        Ok(f(&mut data))
    }
}

/// The most `Undefined` slots a single array write may pad past the end.
pub const MAX_ARRAY_GAP: usize = 1 << 16;

/// An insertion-ordered map from string keys to values.
#[derive(Clone)]
pub struct Object(Arc<Node<IndexMap<String, Value>>>);

impl Object {
    pub fn new() -> Self {
        Object(Arc::new(Node::new(IndexMap::new())))
    }

    pub fn from_map(map: IndexMap<String, Value>) -> Self {
        Object(Arc::new(Node::new(map)))
    }

    /// Returns true if both handles point at the same container.
    #[inline]
    pub fn ptr_eq(a: &Object, b: &Object) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.0.is_frozen()
    }

    /// Freeze this container (not its children). Returns true if it was not
    /// frozen before.
    pub fn freeze(&self) -> bool {
        self.0.freeze()
    }

    pub fn len(&self) -> usize {
        self.0.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.data.read().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.data.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.data.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.data.read().keys().cloned().collect()
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of the underlying map.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.0.data.read().clone()
    }

    /// Insert or overwrite a key. New keys are appended; existing keys keep
    /// their position.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> CowResult<Option<Value>> {
        let key = key.into();
        self.0.mutate("object", |map| map.insert(key, value))
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&self, key: &str) -> CowResult<Option<Value>> {
        self.0.mutate("object", |map| map.shift_remove(key))
    }

    /// A new, unfrozen object holding the same entry handles.
    pub fn shallow_copy(&self) -> Object {
        Object::from_map(self.to_map())
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::new()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if Object::ptr_eq(self, other) {
            return true;
        }
        let (a, b) = (self.to_map(), other.to_map());
        a.len() == b.len()
            && a.iter()
                .zip(b.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Object::from_map(iter.into_iter().collect())
    }
}

/// An ordered sequence of values.
#[derive(Clone)]
pub struct Array(Arc<Node<Vec<Value>>>);

impl Array {
    pub fn new() -> Self {
        Array(Arc::new(Node::new(Vec::new())))
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Array(Arc::new(Node::new(items)))
    }

    /// Returns true if both handles point at the same container.
    #[inline]
    pub fn ptr_eq(a: &Array, b: &Array) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.0.is_frozen()
    }

    /// Freeze this container (not its elements). Returns true if it was not
    /// frozen before.
    pub fn freeze(&self) -> bool {
        self.0.freeze()
    }

    pub fn len(&self) -> usize {
        self.0.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.data.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.data.read().get(index).cloned()
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.data.read().clone()
    }

    /// Overwrite the element at `index`. Writing past the end pads the gap
    /// with `Undefined`; a gap wider than [`MAX_ARRAY_GAP`] is rejected.
    pub fn set(&self, index: usize, value: Value) -> CowResult<()> {
        self.0.mutate("array", |items| {
            let len = items.len();
            if index >= len {
                if index - len > MAX_ARRAY_GAP {
                    return Err(CowError::IndexOutOfRange { index, len });
                }
                items.resize(index + 1, Value::Undefined);
            }
            items[index] = value;
            Ok(())
        })?
    }

    pub fn push(&self, value: Value) -> CowResult<()> {
        self.0.mutate("array", |items| items.push(value))
    }

    /// Delete the element at `index`, leaving an `Undefined` hole. The length
    /// is unchanged.
    pub fn delete(&self, index: usize) -> CowResult<Option<Value>> {
        self.0.mutate("array", |items| {
            items
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, Value::Undefined))
        })
    }

    /// A new, unfrozen array holding the same element handles.
    pub fn shallow_copy(&self) -> Array {
        Array::from_vec(self.to_vec())
    }
}

impl Default for Array {
    fn default() -> Self {
        Array::new()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        Array::ptr_eq(self, other) || self.to_vec() == other.to_vec()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array::from_vec(iter.into_iter().collect())
    }
}
