//! Error types for json-cow operations.

use json_cow_path::{Path, ValidationError};
use thiserror::Error;

/// Result type alias for json-cow operations.
pub type CowResult<T> = Result<T, CowError>;

/// Errors raised by the engine. Every error is raised synchronously and
/// before the root handle is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CowError {
    /// The value is a host built-in (Map, Date, function, ...) or, for
    /// producers, a nullish value.
    #[error("only objects, arrays, or primitives are supported (found {found})")]
    ShapeRejected {
        /// Name of the rejected kind.
        found: &'static str,
    },

    #[error("setItems is only supported for objects")]
    SetItemsRequiresContainer,

    #[error("setItem is only supported for arrays and objects")]
    SetItemRequiresContainer,

    #[error("dispatch is only supported for objects")]
    UpdateRequiresContainer,

    #[error("array is not found at provided path: `{path}`")]
    ArrayNotFound { path: Path },

    /// A write or draft navigation went through a value that is not an
    /// object or array.
    #[error("value at `{path}` is not an object or array")]
    NotAContainer { path: Path },

    #[error("`{segment}` is not a valid array index at `{path}`")]
    InvalidIndex { path: Path, segment: String },

    /// An array write landing too far past the end.
    #[error("index {index} is too far past the end of an array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Direct mutation of a frozen container.
    #[error("cannot mutate a frozen {kind}")]
    Frozen { kind: &'static str },

    #[error(transparent)]
    InvalidPath(#[from] ValidationError),
}

impl CowError {
    #[inline]
    pub fn shape_rejected(found: &'static str) -> Self {
        CowError::ShapeRejected { found }
    }

    #[inline]
    pub fn array_not_found(path: Path) -> Self {
        CowError::ArrayNotFound { path }
    }

    #[inline]
    pub fn not_a_container(path: Path) -> Self {
        CowError::NotAContainer { path }
    }

    #[inline]
    pub fn invalid_index(path: Path, segment: impl Into<String>) -> Self {
        CowError::InvalidIndex {
            path,
            segment: segment.into(),
        }
    }

    /// Report an out-of-range array write as an invalid index at `path`.
    pub(crate) fn at_index(self, path: Path, segment: impl Into<String>) -> Self {
        match self {
            CowError::IndexOutOfRange { .. } => CowError::invalid_index(path, segment),
            other => other,
        }
    }
}
