//! Path-addressed copy-on-write updates over JSON-like trees.
//!
//! A tree lives in a shared root. [`Query`] values are reusable paths into
//! that root: reading resolves the path against the current tree, writing
//! produces a new tree that clones only the ancestors of the written location
//! and shares everything else with the previous version. Installed roots are
//! deep-frozen by default, so a stale reference can never be mutated in place.
//!
//! # Example
//!
//! ```
//! use json_cow::{query, Value};
//! use serde_json::json;
//!
//! let person = query(json!({
//!     "name": "John",
//!     "address": {"city": "NYC", "emails": ["john@x.com"]}
//! }))
//! .unwrap();
//!
//! let before = person.root_value();
//! let city = person.descend("address").descend("city");
//! city.set("Boston").unwrap();
//!
//! assert_eq!(city.get(), Value::from("Boston"));
//! assert_eq!(before.to_json()["address"]["city"], "NYC");
//!
//! person
//!     .descend("address")
//!     .update(|draft| draft.child("emails")?.push("j@y.com"))
//!     .unwrap();
//! assert_eq!(person.descend_path("address.emails.1").get(), Value::from("j@y.com"));
//! ```

pub mod clone;
pub mod draft;
pub mod error;
pub mod freeze;
pub mod options;
pub mod query;
pub mod resolve;
pub mod rewrite;
pub mod root;
pub mod shape;
pub mod value;

pub use json_cow_path::{format_dotted, parse_dotted, path, Path, Seg};

pub use clone::shallow_clone;
pub use draft::{apply_producer, Draft};
pub use error::{CowError, CowResult};
pub use freeze::deep_freeze;
pub use options::QueryOptions;
pub use query::Query;
pub use rewrite::Transaction;
pub use root::{ChangeKind, ChangeRecord, ChangeSource, Listener, RootHandle, Subscription};
pub use shape::{classify, validate, Shape};
pub use value::{Array, Binary, HostKind, Object, Symbol, TypedArrayKind, Value, MAX_ARRAY_GAP};

/// Create a root holding `initial` and return a query for its top.
///
/// With `deep_freeze` set, every root installed by a write is deep-frozen.
/// The initial value itself is stored as given.
///
/// # Errors
///
/// Returns [`CowError::ShapeRejected`] if `initial` is a host built-in such as
/// a `Map` or a `Date`.
pub fn create_query(initial: impl Into<Value>, deep_freeze: bool) -> CowResult<Query> {
    Query::with_options(initial, QueryOptions { deep_freeze })
}

/// [`create_query`] with deep freezing enabled.
pub fn query(initial: impl Into<Value>) -> CowResult<Query> {
    create_query(initial, true)
}

/// Alias of [`query`].
pub fn atom(initial: impl Into<Value>) -> CowResult<Query> {
    query(initial)
}
