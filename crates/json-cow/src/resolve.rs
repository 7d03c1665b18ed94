//! Reading values out of a tree by path.

use json_cow_path::{Path, Seg};

use crate::value::Value;

/// Walk `path` from `root`.
///
/// Returns `None` as soon as a step misses or lands on a non-container.
pub fn find(root: &Value, path: &[Seg]) -> Option<Value> {
    let mut current = root.clone();
    for seg in path {
        current = current.get(seg)?;
    }
    Some(current)
}

/// Read the value at `path`, `Undefined` on any miss.
pub fn get(root: &Value, path: &Path) -> Value {
    find(root, path.segments()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_cow_path::path;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let root = Value::from(json!({"address": {"emails": ["a@x", "b@x"]}}));
        assert_eq!(get(&root, &path!("address", "emails", 1)), Value::from("b@x"));
        assert_eq!(get(&root, &path!()), root);
    }

    #[test]
    fn test_miss_is_undefined() {
        let root = Value::from(json!({"a": {"b": 1}}));
        assert_eq!(get(&root, &path!("a", "c")), Value::Undefined);
        assert_eq!(get(&root, &path!("a", "b", "c")), Value::Undefined);
        assert_eq!(get(&root, &path!("x", "y", "z")), Value::Undefined);
    }

    #[test]
    fn test_find_distinguishes_present_undefined() {
        let root = Value::from(vec![Value::Undefined]);
        assert_eq!(find(&root, &[Seg::Index(0)]), Some(Value::Undefined));
        assert_eq!(find(&root, &[Seg::Index(1)]), None);
    }
}
