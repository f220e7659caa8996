//! Query tools over the registry, as exposed to tool-dispatch front ends.
//!
//! Each tool returns a serializable response; the CLI prints it as JSON.

mod types;

pub use types::*;

use crate::error::{AtlasError, Result};
use crate::models::*;
use crate::registry::Registry;

#[derive(Debug, Clone)]
pub struct AtlasTools {
    registry: Registry,
}

impl AtlasTools {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// All registered projects. With `enrich`, provider fields are included.
    pub fn list_projects(&self, enrich: bool) -> Result<Vec<ProjectSummary>> {
        let projects = self.registry.all_projects()?;
        let providers = if enrich {
            self.registry.list_providers()?
        } else {
            Vec::new()
        };

        Ok(projects
            .into_iter()
            .map(|p| {
                let p = self.registry.enrich_with(&providers, p);
                summarize(p)
            })
            .collect())
    }

    /// Full metadata for one project, enriched by providers.
    pub fn get_project(&self, slug: &str) -> Result<GetProjectResponse> {
        let Some(project) = self.registry.find_project_by_slug(slug)? else {
            return Ok(GetProjectResponse::NotFound {
                error: format!("Project '{}' not found", slug),
            });
        };
        let project = self.registry.enrich_project(project)?;
        Ok(GetProjectResponse::Found(full_view(&project)))
    }

    pub fn search_projects(&self, req: &SearchProjectsRequest) -> Result<Vec<ProjectSummary>> {
        let query = req.query.to_lowercase();
        let tag = req.tag.to_lowercase();
        let group = req.group.to_lowercase();

        Ok(self
            .registry
            .all_projects()?
            .into_iter()
            .filter(|p| {
                if !query.is_empty() {
                    let searchable = format!(
                        "{} {} {}",
                        p.text_field("slug"),
                        p.text_field("name"),
                        p.text_field("summary")
                    )
                    .to_lowercase();
                    if !searchable.contains(&query) {
                        return false;
                    }
                }
                if !tag.is_empty() && !p.tags().iter().any(|t| t.to_lowercase() == tag) {
                    return false;
                }
                group.is_empty() || p.text_field("group").to_lowercase() == group
            })
            .map(summarize)
            .collect())
    }

    /// Project owning `path`, or the working directory when `path` is empty.
    pub fn get_current_project(&self, path: &str) -> Result<CurrentProjectResponse> {
        let target = if path.is_empty() {
            std::env::current_dir()
                .map_err(|e| AtlasError::invalid_path(".", e.to_string()))?
                .to_string_lossy()
                .into_owned()
        } else {
            path.to_string()
        };

        match self.registry.find_project_for_path(&target)? {
            Some(project) => {
                let project = self.registry.enrich_project(project)?;
                Ok(CurrentProjectResponse::Found(full_view(&project)))
            }
            None => Ok(CurrentProjectResponse::NoMatch { project: None }),
        }
    }

    pub fn list_providers(&self) -> Result<Vec<Provider>> {
        self.registry.list_providers()
    }

    pub fn resolve_path(&self, slug: &str, relative: &str) -> Result<ResolvedPathResponse> {
        let resolved = self.registry.resolve_project_path(slug, relative)?;
        Ok(ResolvedPathResponse {
            slug: resolved.slug,
            path: resolved.path.to_string_lossy().into_owned(),
        })
    }
}

fn summarize(project: Project) -> ProjectSummary {
    ProjectSummary {
        slug: project.text_field("slug"),
        path: project.text_field("path"),
        repo: project.text_field("repo"),
        name: project.text_field("name"),
        summary: project.text_field("summary"),
        tags: project.tags(),
        group: project.text_field("group"),
        providers: project.provider_data,
    }
}

/// Merged view without `additional_paths`, which only matter for matching.
fn full_view(project: &Project) -> ProjectView {
    let mut view = project.to_json();
    view.remove("additional_paths");
    view
}
