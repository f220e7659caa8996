//! Providers: plugins that contribute extra per-project data.
//!
//! Definitions are documents in `<atlas_dir>/providers/*.yaml`, read in file
//! name order. A `file` provider names a file inside each project; its parsed
//! contents are attached to the project under the provider's `field_name`.
//! `mcp_query` providers are listed but never queried here.

use std::fs;

use crate::error::Result;
use crate::models::*;
use crate::parser::parse_document;
use crate::registry::{read_optional, Registry};

impl Registry {
    /// All valid provider definitions. Invalid ones are skipped.
    pub fn list_providers(&self) -> Result<Vec<Provider>> {
        let dir = self.config().providers_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files: Vec<_> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
                .collect(),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Cannot list providers");
                return Ok(Vec::new());
            }
        };
        files.sort();

        let mut providers = Vec::new();
        for path in files {
            let text = match read_optional(&path) {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable provider");
                    continue;
                }
            };
            match Provider::from_definition(parse_document(&text)) {
                Some(provider) => providers.push(provider),
                None => {
                    tracing::debug!(file = %path.display(), "Skipping incomplete provider definition")
                }
            }
        }
        Ok(providers)
    }

    /// Attach data from every registered provider to `project`.
    pub fn enrich_project(&self, project: Project) -> Result<Project> {
        let providers = self.list_providers()?;
        Ok(self.enrich_with(&providers, project))
    }

    /// Attach data from `providers`. Projects without an existing directory
    /// are returned unchanged.
    pub fn enrich_with(&self, providers: &[Provider], mut project: Project) -> Project {
        if providers.is_empty() || self.project_dir(&project).is_none() {
            return project;
        }

        for provider in providers {
            if let Some(data) = self.read_provider_data(provider, &project) {
                project
                    .provider_data
                    .insert(provider.field_name.clone(), data);
            }
        }
        project
    }

    fn read_provider_data(&self, provider: &Provider, project: &Project) -> Option<ProviderData> {
        let project_file = match (provider.kind, &provider.project_file) {
            (ProviderKind::File, Some(file)) => file,
            (kind, _) => {
                tracing::debug!(provider = %provider.name, kind = kind.as_str(), "Provider type not queried");
                return None;
            }
        };

        let resolved = match self.resolver().resolve_subpath(&project.record, project_file) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(provider = %provider.name, slug = project.slug(), error = %e, "Provider file rejected");
                return None;
            }
        };

        let text = match read_optional(resolved.as_path()) {
            Ok(text) => text?,
            Err(e) => {
                tracing::warn!(provider = %provider.name, error = %e, "Skipping unreadable provider file");
                return None;
            }
        };

        let doc = parse_document(&text);
        Some(match doc.get(&provider.field_name) {
            Some(value) => ProviderData::Field(value.clone()),
            None => ProviderData::Document(doc),
        })
    }
}
