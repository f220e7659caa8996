use std::fs;
use std::path::{Path, PathBuf};

use atlas::models::ProjectRecord;
use atlas::resolver::PathResolver;
use atlas::AtlasError;
use speculate2::speculate;
use tempfile::TempDir;

/// Canonical temp root, so expectations match resolved paths on every platform.
fn canonical_root(dir: &TempDir) -> PathBuf {
    dir.path().canonicalize().expect("Failed to canonicalize temp dir")
}

fn mkdirs(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(&path).expect("Failed to create directory");
    path
}

fn record(slug: &str, path: &Path, additional: &[&PathBuf]) -> ProjectRecord {
    ProjectRecord {
        slug: slug.to_string(),
        path: path.to_string_lossy().into_owned(),
        repo: String::new(),
        additional_paths: additional
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect(),
    }
}

fn slug_for(resolver: &PathResolver, records: &[ProjectRecord], target: &Path) -> Option<String> {
    resolver
        .find_project_for_path(records, &target.to_string_lossy())
        .expect("Resolution failed")
        .map(|r| r.slug.clone())
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = canonical_root(&dir);
        let resolver = PathResolver::new(root.join("home"));
    }

    describe "resolve_subpath" {
        before {
            let project_dir = mkdirs(&root, "project/src");
            let project_dir = project_dir.parent().unwrap().to_path_buf();
            fs::write(project_dir.join("README.md"), "# Test\n").unwrap();
        }

        describe "inside a registered project" {
            before {
                let project = record("test-project", &project_dir, &[]);
            }

            it "resolves an existing file" {
                let resolved = resolver.resolve_subpath(&project, "README.md").expect("Should resolve");
                assert_eq!(resolved.path, project_dir.join("README.md"));
                assert_eq!(resolved.slug, "test-project");
            }

            it "resolves a path that does not exist yet" {
                let resolved = resolver.resolve_subpath(&project, "src/new/module.rs").expect("Should resolve");
                assert_eq!(resolved.path, project_dir.join("src/new/module.rs"));
            }

            it "allows dot segments that stay inside the root" {
                let resolved = resolver.resolve_subpath(&project, "src/../README.md").expect("Should resolve");
                assert_eq!(resolved.path, project_dir.join("README.md"));
            }

            it "resolves the root itself" {
                let resolved = resolver.resolve_subpath(&project, ".").expect("Should resolve");
                assert_eq!(resolved.path, project_dir);
            }

            it "rejects every escape through parent segments" {
                let escapes = [
                    "..",
                    "../sibling",
                    "../../../etc/passwd",
                    "src/../../etc/passwd",
                    "src/../../../../../../../..",
                    "./src/./../..",
                    "missing/../../outside",
                ];
                for relative in escapes {
                    let result = resolver.resolve_subpath(&project, relative);
                    assert!(
                        matches!(result, Err(AtlasError::PathBoundaryViolation { .. })),
                        "{} should be rejected, got {:?}",
                        relative,
                        result
                    );
                }
            }

            it "rejects absolute fragments" {
                let result = resolver.resolve_subpath(&project, "/etc/passwd");
                assert!(matches!(result, Err(AtlasError::PathBoundaryViolation { .. })));
            }

            it "rejects a sibling that shares the root as a string prefix" {
                mkdirs(&root, "project-evil");
                let result = resolver.resolve_subpath(&project, "../project-evil/file");
                assert!(matches!(result, Err(AtlasError::PathBoundaryViolation { .. })));
            }
        }

        it "fails with MissingPath when no path is configured" {
            let bare = ProjectRecord::new("bare", "");
            let result = resolver.resolve_subpath(&bare, "README.md");
            assert!(matches!(result, Err(AtlasError::MissingPath(slug)) if slug == "bare"));
        }

        it "fails with InvalidPath when the root does not exist" {
            let gone = record("gone", &root.join("does-not-exist"), &[]);
            let result = resolver.resolve_subpath(&gone, "README.md");
            assert!(matches!(result, Err(AtlasError::InvalidPath { .. })));
        }

        it "fails with InvalidPath when the root is a file" {
            let file_root = record("file", &project_dir.join("README.md"), &[]);
            let result = resolver.resolve_subpath(&file_root, "x");
            assert!(matches!(result, Err(AtlasError::InvalidPath { .. })));
        }

        it "expands a home-relative root" {
            let home_project = mkdirs(&root, "home/code/app");
            let app = ProjectRecord::new("app", "~/code/app");
            let resolved = resolver.resolve_subpath(&app, "lib.rs").expect("Should resolve");
            assert_eq!(resolved.path, home_project.join("lib.rs"));
        }
    }

    describe "find_project_for_path" {
        it "prefers the deepest ancestor" {
            let a = mkdirs(&root, "a");
            let b = mkdirs(&root, "a/b");
            let records = vec![record("A", &a, &[]), record("B", &b, &[])];

            assert_eq!(slug_for(&resolver, &records, &b.join("c")), Some("B".into()));
            assert_eq!(slug_for(&resolver, &records, &a.join("other")), Some("A".into()));
        }

        it "does not depend on registry order for depth" {
            let a = mkdirs(&root, "a");
            let b = mkdirs(&root, "a/b");
            let records = vec![record("B", &b, &[]), record("A", &a, &[])];

            assert_eq!(slug_for(&resolver, &records, &b.join("c/d")), Some("B".into()));
        }

        it "prefers an exact primary match over an additional path" {
            let a = mkdirs(&root, "a");
            let b = mkdirs(&root, "a/b");
            let records = vec![record("A", &a, &[&b]), record("B", &b, &[])];

            assert_eq!(slug_for(&resolver, &records, &b), Some("B".into()));
        }

        it "matches an additional path exactly" {
            let main = mkdirs(&root, "widget");
            let docs = mkdirs(&root, "widget-docs");
            let records = vec![record("widget", &main, &[&docs])];

            assert_eq!(slug_for(&resolver, &records, &docs), Some("widget".into()));
        }

        it "lets a deeper additional path outrank a shallower primary" {
            let x = mkdirs(&root, "x");
            let y = mkdirs(&root, "x/y");
            let elsewhere = mkdirs(&root, "elsewhere");
            let records = vec![record("X", &x, &[]), record("Y", &elsewhere, &[&y])];

            assert_eq!(slug_for(&resolver, &records, &y.join("z")), Some("Y".into()));
        }

        it "breaks depth ties by registry order" {
            let shared = mkdirs(&root, "shared");
            let records = vec![record("first", &shared, &[]), record("second", &shared, &[])];

            assert_eq!(slug_for(&resolver, &records, &shared.join("file")), Some("first".into()));
        }

        it "returns None when nothing contains the path" {
            let a = mkdirs(&root, "a");
            let records = vec![record("A", &a, &[])];

            assert_eq!(slug_for(&resolver, &records, &root.join("b")), None);
            assert_eq!(slug_for(&resolver, &[], &a), None);
        }

        it "does not treat a string prefix as an ancestor" {
            let app = mkdirs(&root, "app");
            let records = vec![record("app", &app, &[])];

            assert_eq!(slug_for(&resolver, &records, &root.join("application")), None);
        }

        it "ignores records without a primary path" {
            let docs = mkdirs(&root, "docs");
            let mut orphan = ProjectRecord::new("orphan", "");
            orphan.additional_paths = vec![docs.to_string_lossy().into_owned()];

            assert_eq!(slug_for(&resolver, &[orphan], &docs), None);
        }

        it "normalizes dot segments in the target" {
            let a = mkdirs(&root, "a");
            let b = mkdirs(&root, "a/b");
            let records = vec![record("A", &a, &[]), record("B", &b, &[])];

            let target = b.join("../b/./c");
            assert_eq!(slug_for(&resolver, &records, &target), Some("B".into()));
        }
    }
}

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn rejects_symlink_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let project_dir = mkdirs(&root, "project");
        let outside = mkdirs(&root, "outside");
        fs::write(outside.join("secret.txt"), "secret").unwrap();
        symlink(&outside, project_dir.join("escape")).unwrap();

        let resolver = PathResolver::new(&root);
        let project = record("p", &project_dir, &[]);

        let result = resolver.resolve_subpath(&project, "escape/secret.txt");
        assert!(matches!(
            result,
            Err(AtlasError::PathBoundaryViolation { .. })
        ));
    }

    #[test]
    fn rejects_dangling_symlink_pointing_outside() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let project_dir = mkdirs(&root, "project");
        symlink(root.join("not-yet-created"), project_dir.join("dangling")).unwrap();

        let resolver = PathResolver::new(&root);
        let project = record("p", &project_dir, &[]);

        let result = resolver.resolve_subpath(&project, "dangling");
        assert!(matches!(
            result,
            Err(AtlasError::PathBoundaryViolation { .. })
        ));
    }

    #[test]
    fn follows_symlink_that_stays_inside() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let project_dir = mkdirs(&root, "project");
        let real = mkdirs(&project_dir, "real");
        symlink(&real, project_dir.join("alias")).unwrap();

        let resolver = PathResolver::new(&root);
        let project = record("p", &project_dir, &[]);

        let resolved = resolver.resolve_subpath(&project, "alias/file.txt").unwrap();
        assert_eq!(resolved.path, real.join("file.txt"));
    }

    #[test]
    fn parent_segment_after_symlink_uses_link_target() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let project_dir = mkdirs(&root, "project");
        let deep = mkdirs(&root, "outside/deep");
        symlink(&deep, project_dir.join("hop")).unwrap();

        let resolver = PathResolver::new(&root);
        let project = record("p", &project_dir, &[]);

        // Lexically this is project/file; through the link it is outside/file.
        let result = resolver.resolve_subpath(&project, "hop/../file");
        assert!(matches!(
            result,
            Err(AtlasError::PathBoundaryViolation { .. })
        ));
    }

    /// Two links pointing at each other under `root`; returns the first.
    fn symlink_loop(root: &Path) -> PathBuf {
        let a = root.join("loop-a");
        let b = root.join("loop-b");
        symlink(&b, &a).unwrap();
        symlink(&a, &b).unwrap();
        a
    }

    #[test]
    fn skips_roots_that_cannot_be_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let looped = symlink_loop(&root);
        let ok = mkdirs(&root, "ok");

        let resolver = PathResolver::new(&root);
        let records = vec![
            record("broken", &looped, &[]),
            record("ok", &ok, &[&looped]),
        ];

        assert_eq!(slug_for(&resolver, &records, &ok.join("src")), Some("ok".into()));
        assert_eq!(slug_for(&resolver, &records, &ok), Some("ok".into()));
    }

    #[test]
    fn fails_when_the_target_is_a_symlink_loop() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let looped = symlink_loop(&root);
        let ok = mkdirs(&root, "ok");

        let resolver = PathResolver::new(&root);
        let records = vec![record("ok", &ok, &[])];

        let result = resolver.find_project_for_path(&records, &looped.join("file").to_string_lossy());
        assert!(matches!(result, Err(AtlasError::InvalidPath { .. })));
    }

    #[test]
    fn symlinked_root_matches_its_target() {
        let dir = tempfile::tempdir().unwrap();
        let root = canonical_root(&dir);
        let real = mkdirs(&root, "real-project");
        let link = root.join("linked-project");
        symlink(&real, &link).unwrap();

        let resolver = PathResolver::new(&root);
        let records = vec![record("linked", &link, &[])];

        assert_eq!(slug_for(&resolver, &records, &real.join("src")), Some("linked".into()));
        assert_eq!(slug_for(&resolver, &records, &link), Some("linked".into()));
    }
}
