//! Serde support for [`Value`].
//!
//! Serialization follows `JSON.stringify`: undefined, symbols and host values
//! are skipped inside objects and become `null` inside arrays, integral
//! numbers are written as integers and non-finite numbers as `null`.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Array, Object, Value};

/// Largest integer magnitude an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn is_skipped(value: &Value) -> bool {
    matches!(value, Value::Undefined | Value::Symbol(_) | Value::Host(_))
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl Value {
    /// Convert to a `serde_json::Value` with the same rules as serialization.
    ///
    /// Bigints outside the 64-bit range become decimal strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null | Value::Symbol(_) | Value::Host(_) => {
                serde_json::Value::Null
            }
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::BigInt(n) => {
                if let Ok(small) = i64::try_from(*n) {
                    serde_json::Value::from(small)
                } else if let Ok(unsigned) = u64::try_from(*n) {
                    serde_json::Value::from(unsigned)
                } else {
                    serde_json::Value::String(n.to_string())
                }
            }
            Value::Binary(b) => serde_json::Value::Array(
                b.bytes().iter().map(|&byte| serde_json::Value::from(byte)).collect(),
            ),
            Value::Object(o) => serde_json::Value::Object(
                o.entries()
                    .into_iter()
                    .filter(|(_, v)| !is_skipped(v))
                    .map(|(k, v)| (k, v.to_json()))
                    .collect(),
            ),
            Value::Array(a) => {
                serde_json::Value::Array(a.to_vec().iter().map(Value::to_json).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null | Value::Symbol(_) | Value::Host(_) => {
                serializer.serialize_unit()
            }
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*n as i64)
                } else if n.is_finite() {
                    serializer.serialize_f64(*n)
                } else {
                    serializer.serialize_unit()
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::BigInt(n) => serializer.serialize_i128(*n),
            Value::Binary(b) => serializer.serialize_bytes(b.bytes()),
            Value::Object(o) => o.serialize(serializer),
            Value::Array(a) => a.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<_> = self
            .entries()
            .into_iter()
            .filter(|(_, v)| !is_skipped(v))
            .collect();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (k, v) in &entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.to_vec();
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in &items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Binary, HostKind, Symbol};
    use serde_json::json;

    #[test]
    fn test_serialize_plain_json() {
        let value = Value::from(json!({"name": "Ada", "tags": ["a", "b"], "age": 36}));
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"name":"Ada","tags":["a","b"],"age":36}"#
        );
    }

    #[test]
    fn test_skipped_values() {
        let obj = Object::new();
        obj.insert("u", Value::Undefined).unwrap();
        obj.insert("s", Value::Symbol(Symbol::new("x"))).unwrap();
        obj.insert("h", Value::Host(HostKind::Map)).unwrap();
        obj.insert(
            "list",
            Value::from(vec![Value::Undefined, Value::Number(f64::NAN), Value::from(1.5)]),
        )
        .unwrap();
        let value = Value::Object(obj);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"list":[null,null,1.5]}"#);
        assert_eq!(value.to_json(), json!({"list": [null, null, 1.5]}));
    }

    #[test]
    fn test_bigint_and_binary_to_json() {
        assert_eq!(Value::BigInt(42).to_json(), json!(42));
        assert_eq!(
            Value::BigInt(i128::MAX).to_json(),
            json!(i128::MAX.to_string())
        );
        assert_eq!(Value::Binary(Binary::blob(vec![1u8, 2])).to_json(), json!([1, 2]));
    }

    #[test]
    fn test_deserialize() {
        let value: Value = serde_json::from_str(r#"{"b":[1,{"c":null}],"a":true}"#).unwrap();
        assert_eq!(value, Value::from(json!({"b": [1, {"c": null}], "a": true})));
        assert_eq!(value.as_object().unwrap().keys()[0], "b");
    }
}
