use indexmap::IndexMap;
use serde::Serialize;

use super::{Document, Value};

/// Metadata key reserved for cache bookkeeping. Never exposed to callers.
pub const CACHE_META_KEY: &str = "_cache_meta";

/// A project as listed in the registry file.
///
/// Records are rebuilt wholesale on every reparse; nothing updates them in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub slug: String,
    /// Primary directory, as written (may start with `~`). Empty when the
    /// registry entry has no `path:` line.
    pub path: String,
    /// Repository reference, e.g. `git@github.com:org/repo.git`.
    pub repo: String,
    /// Secondary directories used only for path matching.
    pub additional_paths: Vec<String>,
}

impl ProjectRecord {
    pub fn new(slug: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Data contributed by a provider for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderData {
    /// The provider file held a key matching the provider's field name.
    Field(Value),
    /// The whole provider file.
    Document(Document),
}

/// A registry record with its cached metadata merged in.
///
/// In the JSON view, metadata keys are layered on top of the registry fields,
/// followed by provider fields. Path resolution only ever uses `record`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub record: ProjectRecord,
    pub metadata: Document,
    pub provider_data: IndexMap<String, ProviderData>,
}

impl Project {
    pub fn new(record: ProjectRecord, mut metadata: Document) -> Self {
        metadata.remove(CACHE_META_KEY);
        Self {
            record,
            metadata,
            provider_data: IndexMap::new(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.record.slug
    }

    /// String field from the merged view, or empty.
    pub fn text_field(&self, key: &str) -> String {
        if let Some(value) = self.metadata.get(key) {
            return value.as_str().unwrap_or_default().to_string();
        }
        match key {
            "slug" => self.record.slug.clone(),
            "path" => self.record.path.clone(),
            "repo" => self.record.repo.clone(),
            _ => String::new(),
        }
    }

    /// Tags from metadata. A scalar `tags` value counts as a single tag.
    pub fn tags(&self) -> Vec<String> {
        match self.metadata.get("tags") {
            Some(Value::Scalar(tag)) if !tag.is_empty() => vec![tag.clone()],
            Some(value) => value.as_list().map(<[String]>::to_vec).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Merged JSON object: registry fields, then metadata, then provider data.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("slug".into(), self.record.slug.clone().into());
        map.insert("path".into(), self.record.path.clone().into());
        map.insert("repo".into(), self.record.repo.clone().into());
        map.insert(
            "additional_paths".into(),
            self.record.additional_paths.clone().into(),
        );

        for (key, value) in self.metadata.iter() {
            map.insert(key.clone(), to_json_value(value));
        }
        for (field, data) in &self.provider_data {
            map.insert(field.clone(), to_json_value(data));
        }
        map
    }
}

fn to_json_value(value: &impl Serialize) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
