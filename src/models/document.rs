use indexmap::IndexMap;
use serde::Serialize;

/// A parsed metadata value.
///
/// Serializes untagged: scalars and multiline text as strings, lists as
/// arrays, maps as objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
    /// One level deep; nested maps are not part of the grammar.
    Map(IndexMap<String, String>),
    /// Newline-joined block with trailing blank lines trimmed.
    MultilineText(String),
}

impl Value {
    /// Text of a scalar or multiline value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) | Self::MultilineText(s) => Some(s),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Keyed document produced from a metadata text.
///
/// Lookup ignores order, but insertion order is kept so serialized output
/// follows the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document(IndexMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. A repeated key keeps its first position and takes the
    /// new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar or multiline text under `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
