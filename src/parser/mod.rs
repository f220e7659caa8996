//! Line-oriented parsers for the restricted YAML-like grammar.
//!
//! Both parsers are lenient: a line that does not fit the grammar is skipped
//! and parsing continues. The inputs are hand-edited files, so a typo costs
//! one field rather than the whole file.

mod document;
mod registry;

pub use document::parse_document;
pub use registry::parse_registry;

/// Remove one pair of matching `"` or `'` quotes around a value.
pub(crate) fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Value of a `key: value` line: everything after the first colon, trimmed
/// and unquoted.
pub(crate) fn value_after_colon(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, value)) => unquote(value.trim()),
        None => "",
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_blank_or_comment(line: &str) -> bool {
    line.trim().is_empty() || is_comment(line)
}

/// Strip exactly `width` leading spaces. Lines indented deeper do not match.
fn indented(line: &str, width: usize) -> Option<&str> {
    let rest = line.get(width..)?;
    let prefix = &line[..width];
    if prefix.bytes().all(|b| b == b' ') && !rest.starts_with(' ') {
        Some(rest)
    } else {
        None
    }
}
