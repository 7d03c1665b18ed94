//! Recursive freezing of value trees.

use crate::value::Value;

/// Freeze every container reachable from `value`, children before parents.
///
/// Already-frozen containers are assumed to be frozen all the way down and are
/// not descended into, so re-freezing a new root after a write only visits the
/// freshly cloned spine. Leaves (including binary and host values) are left
/// alone. Returns the number of containers this call froze.
pub fn deep_freeze(value: &Value) -> usize {
    match value {
        Value::Object(o) if !o.is_frozen() => {
            let mut count = 0;
            for (_, child) in o.entries() {
                count += deep_freeze(&child);
            }
            count + usize::from(o.freeze())
        }
        Value::Array(a) if !a.is_frozen() => {
            let mut count = 0;
            for child in a.to_vec() {
                count += deep_freeze(&child);
            }
            count + usize::from(a.freeze())
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clone::shallow_clone;
    use crate::value::Binary;
    use json_cow_path::Seg;
    use serde_json::json;

    #[test]
    fn test_freezes_whole_tree() {
        let value = Value::from(json!({"a": {"b": [1, {"c": 2}]}, "d": 3}));
        assert_eq!(deep_freeze(&value), 4);
        let a = value.get(&Seg::key("a")).unwrap();
        let b = a.get(&Seg::key("b")).unwrap();
        assert!(value.is_frozen());
        assert!(a.is_frozen());
        assert!(b.is_frozen());
        assert!(b.get(&Seg::Index(1)).unwrap().is_frozen());
    }

    #[test]
    fn test_refreeze_is_noop() {
        let value = Value::from(json!({"a": [1]}));
        deep_freeze(&value);
        assert_eq!(deep_freeze(&value), 0);
    }

    #[test]
    fn test_only_new_spine_is_visited() {
        let value = Value::from(json!({"a": {"x": 1}, "b": {"y": 2}}));
        deep_freeze(&value);
        let next = shallow_clone(&value);
        next.as_object()
            .unwrap()
            .insert("c", Value::from(json!({"z": 3})))
            .unwrap();
        assert_eq!(deep_freeze(&next), 2);
    }

    #[test]
    fn test_leaves_are_ignored() {
        assert_eq!(deep_freeze(&Value::from(1)), 0);
        assert_eq!(deep_freeze(&Value::Binary(Binary::blob(vec![1u8]))), 0);
        let holder = Value::from(vec![Value::Binary(Binary::blob(vec![1u8]))]);
        assert_eq!(deep_freeze(&holder), 1);
    }
}
