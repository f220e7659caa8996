//! File-backed project registry.
//!
//! Every call re-reads the registry file and any cached metadata it needs.
//! There is no in-memory state to invalidate, so independent callers never
//! see stale data and never need locking.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::models::*;
use crate::parser::{parse_document, parse_registry};
use crate::resolver::{PathResolver, ResolvedPath};

#[derive(Debug, Clone)]
pub struct Registry {
    config: AtlasConfig,
    resolver: PathResolver,
}

impl Registry {
    pub fn open(config: AtlasConfig) -> Self {
        let resolver = PathResolver::new(config.home_dir.clone());
        Self { config, resolver }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    // ============================================================
    // Registry file
    // ============================================================

    /// Parse the registry file. A missing file is an empty registry.
    pub fn load_records(&self) -> Result<Vec<ProjectRecord>> {
        let Some(text) = read_optional(&self.config.registry_path())? else {
            return Ok(Vec::new());
        };

        let records = parse_registry(&text);
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.slug.as_str()) {
                tracing::warn!(slug = %record.slug, "Duplicate slug in registry, first entry wins");
            }
        }
        Ok(records)
    }

    /// Cached metadata for a project, or `None` if there is no cache file.
    pub fn read_project_cache(&self, slug: &str) -> Result<Option<Document>> {
        let text = read_optional(&self.config.cache_file(slug))?;
        Ok(text.as_deref().map(parse_document))
    }

    // ============================================================
    // Projects
    // ============================================================

    /// All registered projects with their cached metadata merged in.
    pub fn all_projects(&self) -> Result<Vec<Project>> {
        let records = self.load_records()?;
        Ok(records
            .into_iter()
            .map(|record| self.merge_cache(record))
            .collect())
    }

    pub fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let record = self.find_record(slug)?;
        Ok(record.map(|r| self.merge_cache(r)))
    }

    /// Resolve `relative` inside the project registered as `slug`.
    ///
    /// This is the only way tools should turn a slug into an on-disk path.
    pub fn resolve_project_path(&self, slug: &str, relative: &str) -> Result<ResolvedPath> {
        let record = self
            .find_record(slug)?
            .ok_or_else(|| AtlasError::ProjectNotFound(slug.to_string()))?;
        self.resolver.resolve_subpath(&record, relative)
    }

    /// Find the project that owns `target`. See
    /// [`PathResolver::find_project_for_path`] for the matching rules.
    pub fn find_project_for_path(&self, target: &str) -> Result<Option<Project>> {
        let records = self.load_records()?;
        let matched = self.resolver.find_project_for_path(&records, target)?;
        Ok(matched.cloned().map(|r| self.merge_cache(r)))
    }

    /// Existing canonical directory of a project, if it has one.
    pub fn project_dir(&self, project: &Project) -> Option<PathBuf> {
        if !project.record.has_path() {
            return None;
        }
        self.resolver.canonicalize_root(&project.record.path).ok()
    }

    fn find_record(&self, slug: &str) -> Result<Option<ProjectRecord>> {
        Ok(self.load_records()?.into_iter().find(|r| r.slug == slug))
    }

    fn merge_cache(&self, record: ProjectRecord) -> Project {
        let metadata = match self.read_project_cache(&record.slug) {
            Ok(doc) => doc.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(slug = %record.slug, error = %e, "Ignoring unreadable project cache");
                Document::new()
            }
        };
        Project::new(record, metadata)
    }
}

/// Read a file if it exists. Missing is `None`; unreadable is an error.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| AtlasError::Io {
            path: path.to_path_buf(),
            source,
        })
}
