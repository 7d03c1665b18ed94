//! Validation functions for dotted paths.

use thiserror::Error;

use crate::types::Path;

/// Maximum allowed dotted string length.
const MAX_DOTTED_LENGTH: usize = 1024;

/// Maximum allowed path depth.
const MAX_PATH_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("dotted path is longer than {MAX_DOTTED_LENGTH} characters")]
    DottedTooLong,
    #[error("dotted path has an empty component at position {0}")]
    EmptyComponent(usize),
    #[error("path is deeper than {MAX_PATH_LENGTH} segments")]
    PathTooLong,
}

/// Validate a dotted path string.
///
/// # Errors
///
/// Returns an error if:
/// - The string exceeds the maximum length (1024 characters)
/// - A component is empty (`a..b`, `.a`, `a.`)
/// - The path is deeper than 256 segments
///
/// # Example
///
/// ```
/// use json_cow_path::validate_dotted;
///
/// validate_dotted("").unwrap();  // Root is valid
/// validate_dotted("address.city").unwrap();
/// validate_dotted("address..city").unwrap_err();
/// ```
pub fn validate_dotted(dotted: &str) -> Result<(), ValidationError> {
    if dotted.is_empty() {
        return Ok(());
    }
    if dotted.len() > MAX_DOTTED_LENGTH {
        return Err(ValidationError::DottedTooLong);
    }
    let mut depth = 0;
    for (i, component) in dotted.split('.').enumerate() {
        if component.is_empty() {
            return Err(ValidationError::EmptyComponent(i));
        }
        depth += 1;
    }
    if depth > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong);
    }
    Ok(())
}

/// Validate a path.
///
/// # Example
///
/// ```
/// use json_cow_path::{validate_path, Path, Seg};
///
/// validate_path(&Path::root().key("a").key("b")).unwrap();
/// let deep: Path = (0..300).map(Seg::Index).collect();
/// validate_path(&deep).unwrap_err();
/// ```
pub fn validate_path(path: &Path) -> Result<(), ValidationError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong);
    }
    Ok(())
}
