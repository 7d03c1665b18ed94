//! Leaf kinds that are not plain JSON: symbols, binary blobs, and host
//! built-ins.

use std::fmt;
use std::sync::Arc;

/// Element type of a typed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

/// A host built-in that the engine never accepts as a tree root.
///
/// These are the opaque object kinds a host runtime can hand over: keyed
/// collections, dates, callables, buffers and the like. Nested occurrences
/// are carried as leaves; only validation boundaries reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    Function,
    Promise,
    Date,
    RegExp,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Error,
    BigIntObject,
    ArrayBuffer,
    DataView,
    TypedArray(TypedArrayKind),
    SharedArrayBuffer,
    Atomics,
    FinalizationRegistry,
    WeakRef,
}

impl HostKind {
    pub fn name(&self) -> &'static str {
        match self {
            HostKind::Function => "Function",
            HostKind::Promise => "Promise",
            HostKind::Date => "Date",
            HostKind::RegExp => "RegExp",
            HostKind::Map => "Map",
            HostKind::Set => "Set",
            HostKind::WeakMap => "WeakMap",
            HostKind::WeakSet => "WeakSet",
            HostKind::Error => "Error",
            HostKind::BigIntObject => "BigInt",
            HostKind::ArrayBuffer => "ArrayBuffer",
            HostKind::DataView => "DataView",
            HostKind::TypedArray(kind) => match kind {
                TypedArrayKind::Int8 => "Int8Array",
                TypedArrayKind::Uint8 => "Uint8Array",
                TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
                TypedArrayKind::Int16 => "Int16Array",
                TypedArrayKind::Uint16 => "Uint16Array",
                TypedArrayKind::Int32 => "Int32Array",
                TypedArrayKind::Uint32 => "Uint32Array",
                TypedArrayKind::Float32 => "Float32Array",
                TypedArrayKind::Float64 => "Float64Array",
            },
            HostKind::SharedArrayBuffer => "SharedArrayBuffer",
            HostKind::Atomics => "Atomics",
            HostKind::FinalizationRegistry => "FinalizationRegistry",
            HostKind::WeakRef => "WeakRef",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A unique symbol. Two symbols are equal only if they are the same symbol,
/// regardless of description.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Symbol(description.into())
    }

    pub fn description(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// An opaque binary leaf (blob or file). Accepted anywhere in a tree, never
/// cloned or frozen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    bytes: Arc<[u8]>,
    name: Option<Arc<str>>,
}

impl Binary {
    /// A nameless blob.
    pub fn blob(bytes: impl Into<Arc<[u8]>>) -> Self {
        Binary {
            bytes: bytes.into(),
            name: None,
        }
    }

    /// A named file.
    pub fn file(name: impl Into<Arc<str>>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Binary {
            bytes: bytes.into(),
            name: Some(name.into()),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_file(&self) -> bool {
        self.name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_identity() {
        let a = Symbol::new("tag");
        let b = Symbol::new("tag");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(b.description(), "tag");
    }

    #[test]
    fn test_host_kind_names() {
        assert_eq!(HostKind::Map.name(), "Map");
        assert_eq!(HostKind::TypedArray(TypedArrayKind::Uint8Clamped).to_string(), "Uint8ClampedArray");
    }

    #[test]
    fn test_binary_file() {
        let file = Binary::file("a.txt", vec![1u8, 2, 3]);
        assert!(file.is_file());
        assert_eq!(file.name(), Some("a.txt"));
        assert_eq!(file.bytes(), &[1, 2, 3]);
        assert!(!Binary::blob(vec![0u8]).is_file());
    }
}
