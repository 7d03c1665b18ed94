//! Reusable path descriptors bound to a root.
//!
//! A [`Query`] is only a path plus a handle to the shared root. Descending
//! never touches the tree; every read and write resolves the path against the
//! root as it is at that moment, so a query built once can be kept and reused
//! across any number of writes.

use json_cow_path::{parse_dotted, validate_dotted, validate_path, Path, Seg};

use crate::draft::{apply_producer, Draft};
use crate::error::{CowError, CowResult};
use crate::options::QueryOptions;
use crate::resolve;
use crate::rewrite::Transaction;
use crate::root::{ChangeRecord, RootHandle, Subscription};
use crate::shape::validate;
use crate::value::Value;

/// A location in a shared tree.
#[derive(Debug, Clone)]
pub struct Query {
    path: Path,
    root: RootHandle,
}

impl Query {
    /// Create a root with the given options and return a query for its top.
    ///
    /// # Errors
    ///
    /// Returns [`CowError::ShapeRejected`] for host built-ins.
    pub fn with_options(initial: impl Into<Value>, options: QueryOptions) -> CowResult<Query> {
        let initial = initial.into();
        validate(&initial)?;
        Ok(Query::from_root(RootHandle::new(initial, options)))
    }

    /// A query for the top of an existing root.
    pub fn from_root(root: RootHandle) -> Query {
        Query {
            path: Path::root(),
            root,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &RootHandle {
        &self.root
    }

    /// A query one step further down. Nothing is resolved.
    pub fn descend(&self, seg: impl Into<Seg>) -> Query {
        Query {
            path: self.path.with_segment(seg.into()),
            root: self.root.clone(),
        }
    }

    /// Descend by a dotted path such as `address.emails.0`.
    pub fn descend_path(&self, dotted: &str) -> Query {
        let mut path = self.path.clone();
        for seg in parse_dotted(dotted) {
            path.push(seg);
        }
        Query {
            path,
            root: self.root.clone(),
        }
    }

    /// Like [`Query::descend_path`], but rejects empty components and paths
    /// past the length and depth limits.
    pub fn try_descend_path(&self, dotted: &str) -> CowResult<Query> {
        validate_dotted(dotted)?;
        let next = self.descend_path(dotted);
        validate_path(&next.path)?;
        Ok(next)
    }

    /// The value at this path in the current root, `Undefined` if any step
    /// misses.
    pub fn get(&self) -> Value {
        resolve::get(&self.root.get(), &self.path)
    }

    /// The whole current tree.
    pub fn root_value(&self) -> Value {
        self.root.get()
    }

    /// Replace the value at this path and return the new root.
    ///
    /// Missing ancestors are created as empty objects. Every ancestor on the
    /// path is cloned; everything else is shared with the previous root.
    pub fn set(&self, value: impl Into<Value>) -> CowResult<Value> {
        let value = value.into();
        if self.path.is_empty() {
            return Ok(self.root.install(&self.path, value));
        }
        let mut txn = Transaction::begin(&self.root.get());
        txn.write(&self.path, value)?;
        Ok(self.root.install(&self.path, txn.commit()))
    }

    /// Like [`Query::set`], with the new value computed from the current one.
    pub fn set_with<F>(&self, updater: F) -> CowResult<Value>
    where
        F: FnOnce(Value) -> Value,
    {
        self.set(updater(self.get()))
    }

    /// Overwrite several entries of the container at this path at once.
    ///
    /// On objects the items are merged in. On arrays only keys that are
    /// canonical indices are applied; other keys are ignored.
    pub fn set_items<I, K, V>(&self, items: I) -> CowResult<&Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let next = match self.get() {
            Value::Array(a) => {
                let next = a.shallow_copy();
                for (key, value) in items {
                    let key = key.into();
                    if let Some(index) = Seg::Key(key.clone()).to_index() {
                        next.set(index, value.into())
                            .map_err(|err| err.at_index(self.path.clone(), key))?;
                    }
                }
                Value::Array(next)
            }
            Value::Object(o) => {
                let next = o.shallow_copy();
                for (key, value) in items {
                    next.insert(key, value.into())?;
                }
                Value::Object(next)
            }
            _ => return Err(CowError::SetItemsRequiresContainer),
        };
        self.set(next)?;
        Ok(self)
    }

    /// Overwrite one entry of the container at this path.
    ///
    /// Arrays take an index (or a key spelling one); objects take a key.
    pub fn set_item(&self, seg: impl Into<Seg>, value: impl Into<Value>) -> CowResult<&Self> {
        let value = value.into();
        self.set_item_with(seg, move |_| value)
    }

    /// Like [`Query::set_item`], with the new entry computed from the current
    /// one (`Undefined` if absent).
    pub fn set_item_with<F>(&self, seg: impl Into<Seg>, updater: F) -> CowResult<&Self>
    where
        F: FnOnce(Value) -> Value,
    {
        let seg = seg.into();
        let current = self.get();
        let value = updater(current.get(&seg).unwrap_or_default());
        let next = match (&current, &seg) {
            (Value::Array(a), _) => {
                let index = seg
                    .to_index()
                    .ok_or_else(|| CowError::invalid_index(self.path.clone(), seg.to_string()))?;
                let next = a.shallow_copy();
                next.set(index, value)
                    .map_err(|err| err.at_index(self.path.clone(), seg.to_string()))?;
                Value::Array(next)
            }
            (Value::Object(o), Seg::Key(key)) => {
                let next = o.shallow_copy();
                next.insert(key.as_str(), value)?;
                Value::Object(next)
            }
            _ => return Err(CowError::SetItemRequiresContainer),
        };
        self.set(next)?;
        Ok(self)
    }

    /// Edit the container at this path through a [`Draft`] and install the
    /// result. Returns the new root.
    pub fn update<F>(&self, mutator: F) -> CowResult<Value>
    where
        F: FnOnce(&mut Draft<'_>) -> CowResult<()>,
    {
        let current = self.get();
        if !current.is_container() {
            return Err(CowError::UpdateRequiresContainer);
        }
        let next = apply_producer(&current, mutator)?;
        self.set(next)
    }

    /// Register a listener on the root this query belongs to.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[ChangeRecord]) + Send + Sync + 'static,
    {
        self.root.subscribe(listener)
    }

    fn current_array(&self) -> CowResult<Vec<Value>> {
        match self.get() {
            Value::Array(a) => Ok(a.to_vec()),
            _ => Err(CowError::array_not_found(self.path.clone())),
        }
    }

    /// The query for the first array element matching `predicate`, or `None`
    /// if nothing matches.
    pub fn find_match<P>(&self, mut predicate: P) -> CowResult<Option<Query>>
    where
        P: FnMut(&Value, usize) -> bool,
    {
        let items = self.current_array()?;
        Ok(items
            .iter()
            .enumerate()
            .position(|(i, item)| predicate(item, i))
            .map(|i| self.descend(i)))
    }

    /// Call `f` with a query for every index of the array at this path.
    ///
    /// The indices are taken from the array as it is when this is called.
    /// The first error stops the iteration.
    pub fn for_each<F>(&self, mut f: F) -> CowResult<&Self>
    where
        F: FnMut(Query) -> CowResult<()>,
    {
        let len = self.current_array()?.len();
        for i in 0..len {
            f(self.descend(i))?;
        }
        Ok(self)
    }

    /// Filter the array at this path, then call `f` once per surviving
    /// element.
    ///
    /// The query handed to `f` is descended by the element's position in the
    /// *filtered* sequence, not by its index in the array. With a predicate
    /// that keeps `[a, b, c]` at indices 1 and 2, `f` receives the queries
    /// for indices 0 and 1. Use [`Query::for_each`] with a check inside the
    /// callback to address the matching elements themselves.
    pub fn filter_then<P, F>(&self, mut predicate: P, mut f: F) -> CowResult<&Self>
    where
        P: FnMut(&Value, usize) -> bool,
        F: FnMut(Query) -> CowResult<()>,
    {
        let items = self.current_array()?;
        let kept = items
            .iter()
            .enumerate()
            .filter(|(i, item)| predicate(*item, *i))
            .count();
        for position in 0..kept {
            f(self.descend(position))?;
        }
        Ok(self)
    }
}
