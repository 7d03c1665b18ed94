//! Path rewriting with an explicit ancestor-clone memo.
//!
//! A [`Transaction`] owns a working copy of a root. Every write clones the
//! containers on the spine from the root down to the target's parent and
//! installs the clones into their (already cloned) parents, so the original
//! tree is never touched and every untouched sibling stays shared. The memo
//! records which spine prefixes have been cloned so that several writes
//! within one transaction clone each ancestor only once. Memo paths are kept
//! in canonical form: index segments below arrays, key segments below
//! objects, so `list.0` and `list."0"` name the same entry.

use std::collections::HashSet;

use json_cow_path::{Path, Seg};
use tracing::trace;

use crate::clone::shallow_clone;
use crate::error::{CowError, CowResult};
use crate::resolve;
use crate::value::Value;

/// A single copy-on-write editing session over one root.
#[derive(Debug)]
pub struct Transaction {
    root: Value,
    cloned: HashSet<Path>,
}

impl Transaction {
    /// Start a transaction. The root container is shallow-cloned right away.
    pub fn begin(root: &Value) -> Self {
        let mut cloned = HashSet::new();
        if root.is_container() {
            cloned.insert(Path::root());
        }
        Transaction {
            root: shallow_clone(root),
            cloned,
        }
    }

    /// The working copy.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Read from the working copy; `Undefined` on a miss.
    pub fn read(&self, path: &Path) -> Value {
        resolve::get(&self.root, path)
    }

    /// Whether the container at `path` is a clone owned by this transaction.
    pub fn is_cloned(&self, path: &Path) -> bool {
        self.cloned.contains(&self.canonical(path))
    }

    pub fn cloned_paths(&self) -> impl Iterator<Item = &Path> {
        self.cloned.iter()
    }

    /// Assign `value` at `path`.
    ///
    /// Missing or non-container ancestors are replaced with empty objects. The
    /// empty path replaces the whole working root.
    pub fn write(&mut self, path: &Path, value: Value) -> CowResult<()> {
        let Some((last, parents)) = path.split_last() else {
            self.root = value;
            self.cloned.clear();
            return Ok(());
        };
        let (parent, prefix) = self.spine(parents)?;
        let target = prefix.with_segment(canonical_seg(&parent, last));
        put(&parent, parents, last, value)?;
        self.forget(&target);
        Ok(())
    }

    /// Delete the entry at `path` and return it. Objects lose the key; arrays
    /// keep their length and get an `Undefined` hole.
    pub fn delete(&mut self, path: &Path) -> CowResult<Option<Value>> {
        let Some((last, parents)) = path.split_last() else {
            self.cloned.clear();
            return Ok(Some(std::mem::take(&mut self.root)));
        };
        let (parent, prefix) = self.spine(parents)?;
        let target = prefix.with_segment(canonical_seg(&parent, last));
        let removed = remove(&parent, parents, last)?;
        self.forget(&target);
        Ok(removed)
    }

    /// Finish the transaction and hand out the new root.
    pub fn commit(self) -> Value {
        trace!(cloned = self.cloned.len(), "transaction committed");
        self.root
    }

    /// Ensure every container from the root down to `parents` is a clone owned
    /// by this transaction. Returns the deepest one and its canonical path.
    fn spine(&mut self, parents: &[Seg]) -> CowResult<(Value, Path)> {
        if !self.root.is_container() {
            return Err(CowError::not_a_container(Path::root()));
        }
        let mut prefix = Path::root();
        if self.cloned.insert(prefix.clone()) {
            self.root = shallow_clone(&self.root);
        }
        let mut current = self.root.clone();
        for seg in parents {
            let child_path = prefix.with_segment(canonical_seg(&current, seg));
            let child = match current.get(seg) {
                Some(child) if child.is_container() && self.cloned.contains(&child_path) => child,
                existing => {
                    let fresh = match existing {
                        Some(child) if child.is_container() => shallow_clone(&child),
                        _ => Value::object(),
                    };
                    put(&current, prefix.segments(), seg, fresh.clone())?;
                    trace!(path = %child_path, kind = fresh.type_name(), "cloned ancestor");
                    self.cloned.insert(child_path.clone());
                    fresh
                }
            };
            current = child;
            prefix = child_path;
        }
        Ok((current, prefix))
    }

    /// Rewrite `path` into memo form by walking the working copy.
    fn canonical(&self, path: &Path) -> Path {
        let mut current = self.root.clone();
        let mut out = Path::root();
        for seg in path.iter() {
            out.push(canonical_seg(&current, seg));
            current = current.get(seg).unwrap_or_default();
        }
        out
    }

    /// Drop memo entries at or below `path`: whatever lives there now was
    /// supplied by the caller and must be cloned before it is written into.
    fn forget(&mut self, path: &Path) {
        self.cloned.retain(|p| !path.is_prefix_of(p));
    }
}

/// The memo spelling of `seg` as a child of `container`.
fn canonical_seg(container: &Value, seg: &Seg) -> Seg {
    match (container, seg.to_index()) {
        (Value::Array(_), Some(index)) => Seg::Index(index),
        (Value::Object(_), _) => Seg::Key(seg.to_key().into_owned()),
        _ => seg.clone(),
    }
}

fn array_index(at: &[Seg], seg: &Seg) -> CowResult<usize> {
    seg.to_index()
        .ok_or_else(|| CowError::invalid_index(Path::from_segments(at.to_vec()), seg.to_string()))
}

fn put(container: &Value, at: &[Seg], seg: &Seg, value: Value) -> CowResult<()> {
    match container {
        Value::Object(o) => o.insert(seg.to_key(), value).map(|_| ()),
        Value::Array(a) => a
            .set(array_index(at, seg)?, value)
            .map_err(|err| err.at_index(Path::from_segments(at.to_vec()), seg.to_string())),
        _ => Err(CowError::not_a_container(Path::from_segments(at.to_vec()))),
    }
}

fn remove(container: &Value, at: &[Seg], seg: &Seg) -> CowResult<Option<Value>> {
    match container {
        Value::Object(o) => o.remove(&seg.to_key()),
        Value::Array(a) => a.delete(array_index(at, seg)?),
        _ => Err(CowError::not_a_container(Path::from_segments(at.to_vec()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freeze::deep_freeze;
    use json_cow_path::path;
    use serde_json::json;

    fn sample() -> Value {
        Value::from(json!({
            "name": "Ada",
            "address": {"city": "London", "emails": ["a@x", "b@x"]},
            "tags": ["math"]
        }))
    }

    #[test]
    fn test_write_leaves_original_untouched() {
        let original = sample();
        let snapshot = Value::from(original.to_json());
        let mut txn = Transaction::begin(&original);
        txn.write(&path!("address", "city"), Value::from("Paris")).unwrap();
        let next = txn.commit();
        assert_eq!(original, snapshot);
        assert_eq!(resolve::get(&next, &path!("address", "city")), Value::from("Paris"));
        assert!(!next.identical(&original));
    }

    #[test]
    fn test_write_shares_siblings() {
        let original = sample();
        let mut txn = Transaction::begin(&original);
        txn.write(&path!("address", "city"), Value::from("Paris")).unwrap();
        let next = txn.commit();
        let tags = path!("tags");
        let emails = path!("address", "emails");
        assert!(resolve::get(&next, &tags).identical(&resolve::get(&original, &tags)));
        assert!(resolve::get(&next, &emails).identical(&resolve::get(&original, &emails)));
        assert!(!resolve::get(&next, &path!("address"))
            .identical(&resolve::get(&original, &path!("address"))));
    }

    #[test]
    fn test_ancestor_cloned_once() {
        let original = sample();
        let mut txn = Transaction::begin(&original);
        txn.write(&path!("address", "emails", 0), Value::from("c@x")).unwrap();
        let address = txn.read(&path!("address"));
        let emails = txn.read(&path!("address", "emails"));
        txn.write(&path!("address", "emails", 1), Value::from("d@x")).unwrap();
        txn.write(&path!("address", "city"), Value::from("Rome")).unwrap();
        assert!(txn.read(&path!("address")).identical(&address));
        assert!(txn.read(&path!("address", "emails")).identical(&emails));
        assert!(txn.is_cloned(&path!("address", "emails")));
        let next = txn.commit();
        assert_eq!(
            resolve::get(&next, &path!("address")),
            Value::from(json!({"city": "Rome", "emails": ["c@x", "d@x"]}))
        );
    }

    #[test]
    fn test_frozen_original_is_not_written() {
        let original = sample();
        deep_freeze(&original);
        let mut txn = Transaction::begin(&original);
        txn.write(&path!("address", "emails", 0), Value::from("z@x")).unwrap();
        let next = txn.commit();
        assert!(original.is_frozen());
        assert_eq!(resolve::get(&original, &path!("address", "emails", 0)), Value::from("a@x"));
        assert_eq!(resolve::get(&next, &path!("address", "emails", 0)), Value::from("z@x"));
    }

    #[test]
    fn test_auto_vivification() {
        let original = Value::from(json!({"a": 1}));
        let mut txn = Transaction::begin(&original);
        txn.write(&path!("x", "y", "z"), Value::from(true)).unwrap();
        txn.write(&path!("a", "b"), Value::from(2)).unwrap();
        assert_eq!(
            txn.commit(),
            Value::from(json!({"a": {"b": 2}, "x": {"y": {"z": true}}}))
        );
    }

    #[test]
    fn test_write_beneath_assigned_value_clones_it() {
        let supplied = Value::from(json!({"inner": 1}));
        let mut txn = Transaction::begin(&Value::object());
        txn.write(&path!("slot"), supplied.clone()).unwrap();
        txn.write(&path!("slot", "inner"), Value::from(2)).unwrap();
        assert_eq!(supplied, Value::from(json!({"inner": 1})));
        assert_eq!(txn.read(&path!("slot", "inner")), Value::from(2));
    }

    #[test]
    fn test_key_and_index_spellings_share_memo_entries() {
        let original = Value::from(json!({"list": [{"a": 1}], "map": {"0": {"b": 1}}}));
        let mut txn = Transaction::begin(&original);
        txn.write(&path!("list", 0, "a"), Value::from(2)).unwrap();
        let item = txn.read(&path!("list", 0));
        txn.write(&path!("list", "0", "c"), Value::from(3)).unwrap();
        assert!(txn.read(&path!("list", 0)).identical(&item));
        assert!(txn.is_cloned(&path!("list", "0")));

        txn.write(&path!("map", "0", "b"), Value::from(2)).unwrap();
        let entry = txn.read(&path!("map", "0"));
        txn.write(&path!("map", 0, "c"), Value::from(3)).unwrap();
        assert!(txn.read(&path!("map", 0)).identical(&entry));
        assert!(txn.is_cloned(&path!("map", 0)));
    }

    #[test]
    fn test_assignment_through_key_spelling_drops_index_entry() {
        let supplied = Value::from(json!({"inner": 1}));
        let mut txn = Transaction::begin(&Value::from(json!({"list": [{"a": 1}]})));
        txn.write(&path!("list", 0, "a"), Value::from(2)).unwrap();
        txn.write(&path!("list", "0"), supplied.clone()).unwrap();
        assert!(!txn.is_cloned(&path!("list", 0)));
        txn.write(&path!("list", 0, "inner"), Value::from(2)).unwrap();
        assert_eq!(supplied, Value::from(json!({"inner": 1})));
        assert_eq!(txn.read(&path!("list", 0, "inner")), Value::from(2));
    }

    #[test]
    fn test_far_index_write_is_rejected() {
        let mut txn = Transaction::begin(&Value::from(json!({"list": [1, 2]})));
        assert_eq!(
            txn.write(&path!("list", usize::MAX), Value::from(1)),
            Err(CowError::invalid_index(path!("list"), usize::MAX.to_string()))
        );
        assert_eq!(txn.read(&path!("list")), Value::from(json!([1, 2])));
    }

    #[test]
    fn test_array_writes_and_deletes() {
        let original = Value::from(json!({"list": [1, 2]}));
        let mut txn = Transaction::begin(&original);
        txn.write(&path!("list", 3), Value::from(4)).unwrap();
        assert_eq!(txn.delete(&path!("list", "0")).unwrap(), Some(Value::from(1)));
        let list = txn.read(&path!("list"));
        assert_eq!(
            list.as_array().unwrap().to_vec(),
            vec![Value::Undefined, Value::from(2), Value::Undefined, Value::from(4)]
        );
    }

    #[test]
    fn test_object_delete() {
        let original = sample();
        let mut txn = Transaction::begin(&original);
        txn.delete(&path!("address", "city")).unwrap();
        let next = txn.commit();
        assert_eq!(resolve::find(&next, path!("address", "city").segments()), None);
        assert_eq!(resolve::get(&original, &path!("address", "city")), Value::from("London"));
    }

    #[test]
    fn test_invalid_index_into_array() {
        let mut txn = Transaction::begin(&sample());
        let err = txn.write(&path!("tags", "first"), Value::from(1)).unwrap_err();
        assert_eq!(err, CowError::invalid_index(path!("tags"), "first"));
    }

    #[test]
    fn test_non_container_root() {
        let mut txn = Transaction::begin(&Value::from(5));
        assert_eq!(
            txn.write(&path!("a"), Value::from(1)),
            Err(CowError::not_a_container(Path::root()))
        );
        txn.write(&path!(), Value::object()).unwrap();
        txn.write(&path!("a"), Value::from(1)).unwrap();
        assert_eq!(txn.commit(), Value::from(json!({"a": 1})));
    }

    #[test]
    fn test_root_replacement_is_cloned_before_writes() {
        let supplied = Value::from(json!({"k": 1}));
        let mut txn = Transaction::begin(&Value::object());
        txn.write(&path!(), supplied.clone()).unwrap();
        txn.write(&path!("k"), Value::from(2)).unwrap();
        assert_eq!(supplied, Value::from(json!({"k": 1})));
        assert_eq!(txn.commit(), Value::from(json!({"k": 2})));
    }
}
