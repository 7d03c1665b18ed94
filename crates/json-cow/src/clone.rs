//! One-level structural copies.

use crate::value::Value;

/// Copy the top level of a container.
///
/// Arrays and objects become new, unfrozen containers holding the same child
/// handles, so every subtree stays shared. Anything else is returned as is.
/// The argument is never mutated.
pub fn shallow_clone(value: &Value) -> Value {
    match value {
        Value::Object(o) => Value::Object(o.shallow_copy()),
        Value::Array(a) => Value::Array(a.shallow_copy()),
        other => other.clone(),
    }
}
