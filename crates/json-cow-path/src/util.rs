use crate::types::{Path, Seg};

/// Unescapes a dotted-path component.
///
/// `~1` is replaced with `.` and `~0` is replaced with `~`.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 must be replaced before ~0
    component.replace("~1", ".").replace("~0", "~")
}

/// Escapes a dotted-path component.
///
/// `~` is replaced with `~0` and `.` is replaced with `~1`.
pub fn escape_component(component: &str) -> String {
    if !component.contains('.') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('.', "~1")
}

/// Parse a dotted path such as `address.emails.0`.
///
/// The empty string is the root. Components spelling a canonical
/// non-negative integer become [`Seg::Index`]; everything else is an
/// unescaped [`Seg::Key`].
pub fn parse_dotted(dotted: &str) -> Path {
    if dotted.is_empty() {
        return Path::root();
    }
    dotted
        .split('.')
        .map(|component| {
            if is_valid_index(component) {
                if let Ok(i) = component.parse::<usize>() {
                    return Seg::Index(i);
                }
            }
            Seg::Key(unescape_component(component))
        })
        .collect()
}

/// Format a path as a dotted string. The root formats as `""`.
pub fn format_dotted(path: &Path) -> String {
    let mut out = String::new();
    for (i, seg) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        match seg {
            Seg::Key(k) => out.push_str(&escape_component(k)),
            Seg::Index(idx) => out.push_str(&idx.to_string()),
        }
    }
    out
}

/// Check if `parent` strictly contains `child`.
pub fn is_child(parent: &Path, child: &Path) -> bool {
    parent.len() < child.len() && parent.is_prefix_of(child)
}

/// Check if a string represents a valid non-negative integer array index.
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Check if a string consists only of ASCII digits.
pub fn is_integer(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s.bytes().all(|b| b.is_ascii_digit())
}
