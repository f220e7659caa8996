//! Project path resolution.
//!
//! Maps registry records to validated on-disk locations and matches arbitrary
//! paths back to the project that owns them. A [`ResolvedPath`] always equals
//! or descends from the canonical primary path of its project; anything else
//! is a [`AtlasError::PathBoundaryViolation`].

mod canonical;

use std::path::{Path, PathBuf};

pub use canonical::{canonicalize, canonicalize_dir, expand_home};

use crate::error::{AtlasError, Result};
use crate::models::ProjectRecord;

/// A canonical path inside a project's boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub slug: String,
    pub path: PathBuf,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// A root that a path can be matched against.
struct Candidate<'a> {
    record: &'a ProjectRecord,
    root: PathBuf,
    is_primary: bool,
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    home_dir: PathBuf,
}

impl PathResolver {
    pub fn new(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
        }
    }

    /// Expand `~` and canonicalize. The path need not exist.
    pub fn canonicalize(&self, path: &str) -> Result<PathBuf> {
        canonicalize(&expand_home(path, &self.home_dir))
    }

    /// Expand `~` and canonicalize a project root, which must be an existing
    /// directory.
    pub fn canonicalize_root(&self, path: &str) -> Result<PathBuf> {
        canonicalize_dir(&expand_home(path, &self.home_dir))
    }

    /// Resolve `relative` inside the record's primary path.
    ///
    /// Holds under `..` segments, absolute fragments and symlinks: the result
    /// is checked after full resolution, never clamped.
    pub fn resolve_subpath(&self, record: &ProjectRecord, relative: &str) -> Result<ResolvedPath> {
        if !record.has_path() {
            return Err(AtlasError::MissingPath(record.slug.clone()));
        }

        let root = self.canonicalize_root(&record.path)?;
        let target = canonicalize(&root.join(relative))?;

        if !target.starts_with(&root) {
            tracing::warn!(
                slug = %record.slug,
                relative,
                resolved = %target.display(),
                "Rejected path outside project boundary"
            );
            return Err(AtlasError::PathBoundaryViolation {
                slug: record.slug.clone(),
                relative: relative.to_string(),
            });
        }

        Ok(ResolvedPath {
            slug: record.slug.clone(),
            path: target,
        })
    }

    /// Find the record that owns `target`.
    ///
    /// Precedence:
    /// 1. exact match on a primary path
    /// 2. exact match on an additional path
    /// 3. the deepest root (primary or additional) that contains `target`
    ///
    /// Ties at equal depth go to the first candidate in registry order; a
    /// record's primary path precedes its additional paths. Records without a
    /// primary path are ignored.
    pub fn find_project_for_path<'a>(
        &self,
        records: &'a [ProjectRecord],
        target: &str,
    ) -> Result<Option<&'a ProjectRecord>> {
        let target = self.canonicalize(target)?;
        let candidates = self.candidates(records);

        let exact = candidates
            .iter()
            .find(|c| c.is_primary && c.root == target)
            .or_else(|| candidates.iter().find(|c| !c.is_primary && c.root == target));
        if let Some(candidate) = exact {
            return Ok(Some(candidate.record));
        }

        let mut best: Option<(&Candidate, usize)> = None;
        for candidate in candidates.iter().filter(|c| target.starts_with(&c.root)) {
            let depth = candidate.root.components().count();
            if best.map_or(true, |(_, best_depth)| depth > best_depth) {
                best = Some((candidate, depth));
            }
        }

        Ok(best.map(|(candidate, _)| candidate.record))
    }

    fn candidates<'a>(&self, records: &'a [ProjectRecord]) -> Vec<Candidate<'a>> {
        let mut candidates = Vec::new();
        for record in records.iter().filter(|r| r.has_path()) {
            let roots = std::iter::once((record.path.as_str(), true)).chain(
                record
                    .additional_paths
                    .iter()
                    .filter(|p| !p.is_empty())
                    .map(|p| (p.as_str(), false)),
            );
            for (raw, is_primary) in roots {
                match self.canonicalize(raw) {
                    Ok(root) => candidates.push(Candidate {
                        record,
                        root,
                        is_primary,
                    }),
                    Err(e) => {
                        tracing::debug!(slug = %record.slug, path = raw, error = %e, "Skipping unresolvable root");
                    }
                }
            }
        }
        candidates
    }
}
