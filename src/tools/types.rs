//! Request and response types for registry tools.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::ProviderData;

// ============================================================
// Request Types
// ============================================================

/// Filters for `search_projects`. Every filter that is set must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchProjectsRequest {
    /// Case-insensitive substring of slug, name or summary.
    #[serde(default)]
    pub query: String,
    /// Case-insensitive tag membership.
    #[serde(default)]
    pub tag: String,
    /// Case-insensitive group equality.
    #[serde(default)]
    pub group: String,
}

// ============================================================
// Response Types
// ============================================================

/// Project entry for list and search results.
///
/// Serializes as a flat object. Provider fields are written last and replace
/// a summary field of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ProjectView")]
pub struct ProjectSummary {
    pub slug: String,
    pub path: String,
    pub repo: String,
    pub name: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub group: String,
    /// Provider fields, present only when enrichment was requested.
    pub providers: IndexMap<String, ProviderData>,
}

pub type ProjectView = serde_json::Map<String, serde_json::Value>;

impl From<ProjectSummary> for ProjectView {
    fn from(summary: ProjectSummary) -> Self {
        let mut view = ProjectView::new();
        view.insert("slug".into(), summary.slug.into());
        view.insert("path".into(), summary.path.into());
        view.insert("repo".into(), summary.repo.into());
        view.insert("name".into(), summary.name.into());
        view.insert("summary".into(), summary.summary.into());
        view.insert("tags".into(), summary.tags.into());
        view.insert("group".into(), summary.group.into());
        for (field, data) in summary.providers {
            let value = serde_json::to_value(&data).unwrap_or(serde_json::Value::Null);
            view.insert(field, value);
        }
        view
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GetProjectResponse {
    Found(ProjectView),
    NotFound { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CurrentProjectResponse {
    Found(ProjectView),
    /// Serializes as `{"project": null}`.
    NoMatch { project: Option<ProjectView> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPathResponse {
    pub slug: String,
    pub path: String,
}
