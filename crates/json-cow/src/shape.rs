//! Classification of values into the shapes the engine accepts.

use crate::error::{CowError, CowResult};
use crate::value::{HostKind, Value};

/// What kind of value a tree node is, as far as the engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
    /// String, number, boolean, symbol or bigint.
    Primitive,
    /// `null` or `undefined`.
    Nullish,
    /// An opaque blob or file.
    Binary,
    Rejected(HostKind),
}

impl Shape {
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Shape::Object | Shape::Array)
    }

    #[inline]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Shape::Rejected(_))
    }
}

pub fn classify(value: &Value) -> Shape {
    match value {
        Value::Undefined | Value::Null => Shape::Nullish,
        Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::BigInt(_)
        | Value::Symbol(_) => Shape::Primitive,
        Value::Binary(_) => Shape::Binary,
        Value::Host(kind) => Shape::Rejected(*kind),
        Value::Object(_) => Shape::Object,
        Value::Array(_) => Shape::Array,
    }
}

/// Classify `value`, rejecting host built-ins.
///
/// Only the top level is inspected; host values nested inside accepted
/// containers are carried as leaves.
pub fn validate(value: &Value) -> CowResult<Shape> {
    match classify(value) {
        Shape::Rejected(kind) => Err(CowError::shape_rejected(kind.name())),
        shape => Ok(shape),
    }
}
