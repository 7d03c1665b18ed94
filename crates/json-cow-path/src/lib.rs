//! Paths into JSON-like value trees.
//!
//! A [`Path`] is an ordered sequence of [`Seg`]ments, each either an object
//! key or an array index. Dotted strings (`address.emails.0`) are only a
//! convenience format on top of that; keys containing `.` or `~` are escaped
//! as `~1` and `~0` so every path round-trips.
//!
//! # Example
//!
//! ```
//! use json_cow_path::{format_dotted, parse_dotted, path, Seg};
//!
//! let p = parse_dotted("address.emails.0");
//! assert_eq!(p, path!("address", "emails", 0));
//! assert_eq!(p[2], Seg::Index(0));
//!
//! let odd = path!("example.com", "~home");
//! assert_eq!(format_dotted(&odd), "example~1com.~0home");
//! assert_eq!(parse_dotted(&format_dotted(&odd)), odd);
//! ```

pub mod types;
pub mod util;
pub mod validate;

pub use types::{Path, Seg};
pub use util::{
    escape_component, format_dotted, is_child, is_integer, is_valid_index, parse_dotted,
    unescape_component,
};
pub use validate::{validate_dotted, validate_path, ValidationError};

/// Construct a [`Path`] from a sequence of segments.
///
/// String expressions become key segments, `usize` expressions become index
/// segments.
///
/// ```
/// use json_cow_path::{path, Path};
///
/// assert_eq!(path!(), Path::root());
/// assert_eq!(path!("items", 0, "name"), Path::root().key("items").index(0).key("name"));
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted_root() {
        assert_eq!(parse_dotted(""), Path::root());
    }

    #[test]
    fn test_parse_dotted_indices() {
        let p = parse_dotted("list.10.v");
        assert_eq!(p, path!("list", 10, "v"));
        // leading zeros are keys, not indices
        assert_eq!(parse_dotted("list.01"), path!("list", "01"));
    }

    #[test]
    fn test_escape_component() {
        assert_eq!(escape_component("a~b"), "a~0b");
        assert_eq!(escape_component("c.d"), "c~1d");
        assert_eq!(escape_component("plain"), "plain");
        assert_eq!(unescape_component("a~0b"), "a~b");
        assert_eq!(unescape_component("c~1d"), "c.d");
        assert_eq!(unescape_component("~01"), "~1");
    }

    #[test]
    fn test_format_dotted() {
        assert_eq!(format_dotted(&Path::root()), "");
        assert_eq!(format_dotted(&path!("address", "city")), "address.city");
        assert_eq!(format_dotted(&path!("emails", 1)), "emails.1");
        assert_eq!(path!("a.b", 2).to_string(), "a~1b.2");
    }

    #[test]
    fn test_roundtrip() {
        let dotted = ["", "a", "a.b", "a~0b.c~1d.1", "x.0.y.12"];
        for d in dotted {
            let path = parse_dotted(d);
            assert_eq!(format_dotted(&path), d, "failed roundtrip for: {:?}", d);
        }
    }

    #[test]
    fn test_is_child() {
        let parent = path!("foo");
        let child = path!("foo", "bar");
        assert!(is_child(&parent, &child));
        assert!(!is_child(&child, &parent));
        assert!(!is_child(&parent, &parent));
    }

    #[test]
    fn test_is_valid_index() {
        assert!(is_valid_index("0"));
        assert!(is_valid_index("123"));
        assert!(!is_valid_index("-1"));
        assert!(!is_valid_index("1.5"));
        assert!(!is_valid_index("abc"));
        assert!(!is_valid_index(""));
        assert!(!is_valid_index("01"));
    }

    #[test]
    fn test_is_integer() {
        assert!(is_integer("0"));
        assert!(is_integer("007"));
        assert!(!is_integer("-1"));
        assert!(!is_integer(""));
    }
}
