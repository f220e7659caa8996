//! Filesystem locations used by the registry.
//!
//! Configuration is via environment variables:
//! - `ATLAS_DIR` - Atlas data directory (default: `~/.claude/atlas`)

use std::path::{Path, PathBuf};

use crate::error::{AtlasError, Result};

const REGISTRY_FILE: &str = "registry.yaml";
const CACHE_DIR: &str = "cache/projects";
const PROVIDERS_DIR: &str = "providers";

/// Where the registry, metadata cache and provider definitions live, plus the
/// home directory used to expand `~` in registered paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasConfig {
    pub atlas_dir: PathBuf,
    pub home_dir: PathBuf,
}

impl AtlasConfig {
    /// Create with explicit locations.
    pub fn new(atlas_dir: impl Into<PathBuf>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            atlas_dir: atlas_dir.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Create from the environment, falling back to `~/.claude/atlas`.
    pub fn from_env() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            AtlasError::invalid_path("~", "Could not determine home directory")
        })?;
        let atlas_dir = match std::env::var_os("ATLAS_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_atlas_dir(&home_dir),
        };
        Ok(Self::new(atlas_dir, home_dir))
    }

    /// Replace the Atlas directory, keeping the home directory.
    pub fn with_atlas_dir(mut self, atlas_dir: impl Into<PathBuf>) -> Self {
        self.atlas_dir = atlas_dir.into();
        self
    }

    pub fn registry_path(&self) -> PathBuf {
        self.atlas_dir.join(REGISTRY_FILE)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.atlas_dir.join(CACHE_DIR)
    }

    pub fn providers_dir(&self) -> PathBuf {
        self.atlas_dir.join(PROVIDERS_DIR)
    }

    /// Cached metadata file for a project.
    pub fn cache_file(&self, slug: &str) -> PathBuf {
        self.cache_dir().join(format!("{}.yaml", slug))
    }
}

fn default_atlas_dir(home_dir: &Path) -> PathBuf {
    home_dir.join(".claude").join("atlas")
}
