use serde::Serialize;

use super::Document;

/// How a provider obtains its per-project data.
///
/// - `File`: reads a file relative to the project directory
/// - `McpQuery`: queries an HTTP endpoint (listed, never queried here)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    File,
    McpQuery,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::McpQuery => "mcp_query",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "file" => Some(Self::File),
            "mcp_query" => Some(Self::McpQuery),
            _ => None,
        }
    }
}

/// A plugin that contributes extra per-project data under `field_name`.
///
/// Serializes as the full definition document it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub field_name: String,
    #[serde(skip)]
    pub kind: ProviderKind,
    /// Path relative to the project root, for `File` providers.
    #[serde(skip)]
    pub project_file: Option<String>,
    #[serde(skip)]
    pub endpoint: Option<String>,
    #[serde(flatten)]
    pub definition: Document,
}

impl Provider {
    /// Build from a parsed definition. Returns `None` when required fields
    /// are missing or the type is unknown.
    pub fn from_definition(definition: Document) -> Option<Self> {
        let name = non_empty(&definition, "name")?;
        let field_name = non_empty(&definition, "field_name")?;
        let kind = match definition.get_str("type") {
            None => ProviderKind::File,
            Some(s) => ProviderKind::from_str(s)?,
        };
        let project_file = non_empty(&definition, "project_file");
        let endpoint = non_empty(&definition, "endpoint");

        match kind {
            ProviderKind::File if project_file.is_none() => return None,
            ProviderKind::McpQuery if endpoint.is_none() => return None,
            _ => {}
        }

        Some(Self {
            name,
            field_name,
            kind,
            project_file,
            endpoint,
            definition,
        })
    }
}

fn non_empty(definition: &Document, key: &str) -> Option<String> {
    definition
        .get_str(key)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
