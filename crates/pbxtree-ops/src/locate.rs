//! Group lookup and creation by slash-delimited path.
//!
//! Each segment is matched against the current group's children,
//! restricted to groups, by name or by path. The first matching child in
//! display order wins.

use compact_str::CompactString;
use tracing::debug;

use pbxtree_core::{FileElement, ObjectId, ObjectStore, Project, ProjectError, Result, SourceTree};

/// Find the group reached by following `path_expr` from `start`
/// (the root group when `None`).
///
/// Returns `Ok(None)` as soon as a segment has no matching child group.
pub fn locate(
    project: &Project,
    path_expr: &str,
    start: Option<&ObjectId>,
) -> Result<Option<ObjectId>> {
    let mut current = start_group(project, start)?;

    for segment in segments(path_expr) {
        match child_group(project.store(), &current, segment) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    Ok(Some(current))
}

/// Find the group reached by following `path_expr` from `start`
/// (the root group when `None`), creating missing segments on the way.
///
/// New groups are group-relative, take the segment as their path and are
/// appended to their parent's children. Calling this again with the same
/// arguments returns the same group and creates nothing.
pub fn locate_or_create(
    project: &mut Project,
    path_expr: &str,
    start: Option<&ObjectId>,
) -> Result<ObjectId> {
    let mut current = start_group(project, start)?;

    for segment in segments(path_expr) {
        if let Some(next) = child_group(project.store(), &current, segment) {
            current = next;
            continue;
        }

        let group = FileElement::new_group(SourceTree::Group, Some(CompactString::from(segment)));
        let id = project.mint(segment, group);
        project
            .store_mut()
            .group_mut(&current)
            .and_then(FileElement::children_mut)
            .ok_or_else(|| ProjectError::NotAGroup {
                id: current.clone(),
            })?
            .push(id.clone());

        debug!(group = %id, parent = %current, segment, "created group");
        current = id;
    }

    Ok(current)
}

fn start_group(project: &Project, start: Option<&ObjectId>) -> Result<ObjectId> {
    match start {
        Some(id) => {
            project.store().require_group(id)?;
            Ok(id.clone())
        }
        None => project.root_group(),
    }
}

/// Non-empty segments of a slash-delimited path.
fn segments(path_expr: &str) -> impl Iterator<Item = &str> {
    path_expr.split('/').filter(|segment| !segment.is_empty())
}

fn child_group(store: &ObjectStore, parent: &ObjectId, segment: &str) -> Option<ObjectId> {
    store
        .group(parent)?
        .children()
        .iter()
        .find(|child| {
            store
                .group(child)
                .is_some_and(|group| group.matches_segment(segment))
        })
        .cloned()
}
