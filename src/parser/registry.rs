use super::{indented, is_blank_or_comment, unquote, value_after_colon};
use crate::models::ProjectRecord;

const HEADER: &str = "projects:";

/// Parse the registry text into project records, in file order.
///
/// Layout:
/// ```text
/// projects:
///   widget:
///     path: "/home/dev/widget"
///     repo: "git@example.com:acme/widget.git"
///     additional_paths:
///       - "/home/dev/widget-docs"
/// ```
///
/// Blank and comment lines close an open `additional_paths` block so stray
/// list items further down cannot attach to it.
pub fn parse_registry(text: &str) -> Vec<ProjectRecord> {
    let mut projects = Vec::new();
    let mut current: Option<ProjectRecord> = None;
    let mut in_additional = false;

    for raw_line in text.lines() {
        let line = raw_line.trim_end();

        if line == HEADER {
            continue;
        }

        if is_blank_or_comment(line) {
            in_additional = false;
            continue;
        }

        if let Some(slug) = slug_line(line) {
            projects.extend(current.take());
            current = Some(ProjectRecord {
                slug: slug.to_string(),
                ..Default::default()
            });
            in_additional = false;
            continue;
        }

        let Some(record) = current.as_mut() else {
            tracing::trace!(line, "skipping registry line before first project");
            continue;
        };

        if let Some(field) = indented(line, 4) {
            in_additional = false;
            if field.starts_with("path:") {
                record.path = value_after_colon(field).to_string();
            } else if field.starts_with("repo:") {
                record.repo = value_after_colon(field).to_string();
            } else if field == "additional_paths:" {
                in_additional = true;
            }
        } else if let Some(item) = indented(line, 6).and_then(|l| l.strip_prefix("- ")) {
            if in_additional {
                record
                    .additional_paths
                    .push(unquote(item.trim()).to_string());
            }
        } else {
            tracing::trace!(line, "skipping unrecognized registry line");
        }
    }

    projects.extend(current);
    projects
}

/// `  <slug>:` with the slug restricted to alphanumerics, `-` and `_`.
fn slug_line(line: &str) -> Option<&str> {
    let slug = indented(line, 2)?.strip_suffix(':')?;
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(slug)
}
