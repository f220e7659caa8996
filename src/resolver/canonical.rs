//! Canonicalization that tolerates missing trailing components.
//!
//! `std::fs::canonicalize` fails when the path does not exist. Targets handed
//! to the resolver often do not exist yet (a file about to be written), so
//! resolution walks the path one component at a time: existing components are
//! checked for symlinks and followed, `..` pops the last resolved component,
//! and missing components are appended as written.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{AtlasError, Result};

/// Same limit Linux applies to a single lookup (`MAXSYMLINKS`).
const MAX_SYMLINK_HOPS: usize = 40;

/// Expand a leading `~` or `~/` against `home_dir`.
pub fn expand_home(path: &str, home_dir: &Path) -> PathBuf {
    if path == "~" {
        return home_dir.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir.join(rest),
        None => PathBuf::from(path),
    }
}

/// Absolute form of `path` with symlinks and `.`/`..` resolved.
///
/// Relative paths are taken against the process working directory. The path
/// itself does not need to exist.
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| AtlasError::invalid_path(path, e.to_string()))?
            .join(path)
    };

    let mut hops = 0;
    resolve_components(&absolute, path, &mut hops)
}

/// Canonicalize and require an existing directory.
pub fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = canonicalize(path)?;
    match fs::metadata(&canonical) {
        Ok(meta) if meta.is_dir() => Ok(canonical),
        Ok(_) => Err(AtlasError::invalid_path(canonical, "not a directory")),
        Err(_) => Err(AtlasError::invalid_path(canonical, "directory does not exist")),
    }
}

fn resolve_components(path: &Path, original: &Path, hops: &mut usize) -> Result<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => {
                resolved = follow(resolved.join(part), original, hops)?;
            }
        }
    }
    Ok(resolved)
}

/// Resolve `candidate` if it is a symlink. Its parent is already canonical.
fn follow(candidate: PathBuf, original: &Path, hops: &mut usize) -> Result<PathBuf> {
    let meta = match fs::symlink_metadata(&candidate) {
        Ok(meta) => meta,
        Err(e) if is_missing(&e) => return Ok(candidate),
        Err(e) => return Err(AtlasError::invalid_path(original, e.to_string())),
    };
    if !meta.file_type().is_symlink() {
        return Ok(candidate);
    }

    *hops += 1;
    if *hops > MAX_SYMLINK_HOPS {
        return Err(AtlasError::invalid_path(
            original,
            "too many levels of symbolic links",
        ));
    }

    let link = fs::read_link(&candidate)
        .map_err(|e| AtlasError::invalid_path(original, e.to_string()))?;
    let base = candidate.parent().map(Path::to_path_buf).unwrap_or_default();
    resolve_components(&base.join(link), original, hops)
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
