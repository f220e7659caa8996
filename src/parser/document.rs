use indexmap::IndexMap;

use super::{indented, is_blank_or_comment, is_comment, unquote};
use crate::models::{Document, Value};

/// Parser state between lines.
///
/// `Pending` is a key whose inline value was empty: its type is decided by
/// the first indented line that follows (`key: value` makes it a map, `- item`
/// a list). A pending key that never gets a continuation flushes as an empty
/// map.
#[derive(Debug)]
enum State {
    Top,
    Pending(String),
    Map(String, IndexMap<String, String>),
    List(String, Vec<String>),
    Multiline(String, Vec<String>),
}

/// Parse a metadata text into a [`Document`].
///
/// Never fails: unrecognized lines are skipped.
pub fn parse_document(text: &str) -> Document {
    let mut parser = DocumentParser {
        doc: Document::new(),
        state: State::Top,
    };
    for raw_line in text.lines() {
        parser.feed(raw_line.trim_end());
    }
    parser.flush();
    parser.doc
}

struct DocumentParser {
    doc: Document,
    state: State,
}

impl DocumentParser {
    fn feed(&mut self, line: &str) {
        if let State::Multiline(_, lines) = &mut self.state {
            if line.is_empty() {
                lines.push(String::new());
                return;
            }
            if let Some(rest) = line.strip_prefix("  ") {
                lines.push(rest.to_string());
                return;
            }
            if is_comment(line) {
                return;
            }
            self.flush();
        }

        if is_blank_or_comment(line) {
            return;
        }

        if line.starts_with(' ') {
            self.nested(line);
        } else {
            self.flush();
            self.top_level(line);
        }
    }

    fn top_level(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(':') else {
            tracing::trace!(line, "skipping top-level line without key");
            return;
        };
        let key = key.trim_end();
        if !is_identifier(key) {
            tracing::trace!(line, "skipping line with invalid key");
            return;
        }
        let key = key.to_string();
        let value = value.trim();

        if value == "|" {
            self.state = State::Multiline(key, Vec::new());
        } else if value.is_empty() {
            self.state = State::Pending(key);
        } else if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            let items = inner
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| unquote(item).to_string())
                .collect();
            self.doc.insert(key, Value::List(items));
        } else {
            self.doc.insert(key, Value::Scalar(unquote(value).to_string()));
        }
    }

    fn nested(&mut self, line: &str) {
        let Some(rest) = indented(line, 2) else {
            tracing::trace!(line, "skipping line with unexpected indentation");
            return;
        };
        let item = rest.strip_prefix("- ").map(|item| unquote(item.trim()).to_string());

        self.state = match std::mem::replace(&mut self.state, State::Top) {
            State::Pending(key) => match item {
                Some(item) => State::List(key, vec![item]),
                None => match map_entry(rest) {
                    Some((k, v)) => State::Map(key, IndexMap::from([(k, v)])),
                    None => State::Pending(key),
                },
            },
            State::Map(key, mut map) => {
                if item.is_none() {
                    if let Some((k, v)) = map_entry(rest) {
                        map.insert(k, v);
                    }
                }
                State::Map(key, map)
            }
            State::List(key, mut items) => {
                if let Some(item) = item {
                    items.push(item);
                }
                State::List(key, items)
            }
            other => other,
        };
    }

    /// Move the open collection, if any, into the document.
    fn flush(&mut self) {
        match std::mem::replace(&mut self.state, State::Top) {
            State::Top => {}
            State::Pending(key) => self.doc.insert(key, Value::Map(IndexMap::new())),
            State::Map(key, map) => self.doc.insert(key, Value::Map(map)),
            State::List(key, items) => self.doc.insert(key, Value::List(items)),
            State::Multiline(key, lines) => {
                let text = lines.join("\n").trim_end_matches('\n').to_string();
                self.doc.insert(key, Value::MultilineText(text));
            }
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn map_entry(rest: &str) -> Option<(String, String)> {
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }
    let (key, value) = rest.split_once(':')?;
    Some((key.trim().to_string(), unquote(value.trim()).to_string()))
}
