//! Per-root settings.

use serde::{Deserialize, Serialize};

/// Settings for a root handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOptions {
    /// Deep-freeze every root installed by a write.
    pub deep_freeze: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions { deep_freeze: true }
    }
}

impl QueryOptions {
    pub fn with_deep_freeze(mut self, deep_freeze: bool) -> Self {
        self.deep_freeze = deep_freeze;
        self
    }
}
