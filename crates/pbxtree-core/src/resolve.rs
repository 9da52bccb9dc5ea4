//! Absolute path resolution for tree nodes.
//!
//! A node's location depends on its source tree:
//!
//! - `Absolute`: the node's own path, ancestors are ignored
//! - `SourceRoot`: the path joined onto the source root
//! - `Group`: the path joined onto the resolved path of the enclosing group,
//!   found by scanning every group's children (first match in store order)
//!
//! A group-relative node without a parent is the tree root and resolves to
//! the source root itself.

use std::path::{Path, PathBuf};

use crate::error::{ProjectError, Result, UnresolvedReason};
use crate::id::ObjectId;
use crate::node::{FileElement, SourceTree};
use crate::store::ObjectStore;

/// Resolve the absolute path of the element stored under `id`.
pub fn resolve(store: &ObjectStore, id: &ObjectId, source_root: &Path) -> Result<PathBuf> {
    let element = match store.get(id) {
        Some(object) => object
            .as_element()
            .ok_or_else(|| ProjectError::unresolvable(id, UnresolvedReason::NotAnElement))?,
        None => return Err(ProjectError::unknown(id)),
    };
    resolve_element(store, element, id, source_root)
}

/// Resolve the absolute path of `element`, whose identifier is `id`.
///
/// `id` is only used to locate the enclosing group; `element` need not be
/// the object stored under it.
pub fn resolve_element(
    store: &ObjectStore,
    element: &FileElement,
    id: &ObjectId,
    source_root: &Path,
) -> Result<PathBuf> {
    // A valid tree is never deeper than the number of objects in the store.
    resolve_bounded(store, element, id, source_root, store.len() + 1)
}

fn resolve_bounded(
    store: &ObjectStore,
    element: &FileElement,
    id: &ObjectId,
    source_root: &Path,
    depth_left: usize,
) -> Result<PathBuf> {
    match &element.source_tree {
        Some(SourceTree::Absolute) => element
            .path_str()
            .map(PathBuf::from)
            .ok_or_else(|| ProjectError::unresolvable(id, UnresolvedReason::EmptyAbsolutePath)),
        Some(SourceTree::SourceRoot) => Ok(join_optional(source_root, element.path_str())),
        Some(SourceTree::Group) => {
            let Some((parent_id, parent)) = store.parent_of(id) else {
                return Ok(source_root.to_path_buf());
            };
            if depth_left == 0 {
                return Err(ProjectError::unresolvable(id, UnresolvedReason::Cycle));
            }
            let parent_path =
                resolve_bounded(store, parent, parent_id, source_root, depth_left - 1)?;
            Ok(join_optional(&parent_path, element.path_str()))
        }
        Some(SourceTree::Other(_)) | None => Err(ProjectError::unresolvable(
            id,
            UnresolvedReason::UnsupportedSourceTree,
        )),
    }
}

fn join_optional(base: &Path, path: Option<&str>) -> PathBuf {
    match path {
        Some(path) => base.join(path),
        None => base.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ObjectId {
        ObjectId::new(s)
    }

    fn group_with(children: &[&str], path: Option<&str>) -> FileElement {
        let mut group = FileElement::new_group(SourceTree::Group, path.map(Into::into));
        group
            .children_mut()
            .unwrap()
            .extend(children.iter().map(|c| id(c)));
        group
    }

    #[test]
    fn test_absolute_ignores_ancestors() {
        let mut store = ObjectStore::new();
        store.insert(id("ROOT"), group_with(&["G"], None));
        store.insert(id("G"), group_with(&["F"], Some("lib")));
        store.insert(
            id("F"),
            FileElement::new_file_reference(SourceTree::Absolute, "/x/y.c", None, None),
        );

        let path = resolve(&store, &id("F"), Path::new("/proj")).unwrap();
        assert_eq!(path, PathBuf::from("/x/y.c"));
    }

    #[test]
    fn test_absolute_without_path_fails() {
        let mut store = ObjectStore::new();
        let mut file = FileElement::new_file_reference(SourceTree::Absolute, "", None, None);
        file.path = None;
        store.insert(id("F"), file);

        let err = resolve(&store, &id("F"), Path::new("/proj")).unwrap_err();
        assert_eq!(
            err,
            ProjectError::unresolvable(&id("F"), UnresolvedReason::EmptyAbsolutePath)
        );
    }

    #[test]
    fn test_source_root_relative() {
        let mut store = ObjectStore::new();
        store.insert(
            id("F"),
            FileElement::new_file_reference(SourceTree::SourceRoot, "src/x.txt", None, None),
        );
        store.insert(id("G"), FileElement::new_group(SourceTree::SourceRoot, None));

        let root = Path::new("/proj");
        assert_eq!(resolve(&store, &id("F"), root).unwrap(), PathBuf::from("/proj/src/x.txt"));
        assert_eq!(resolve(&store, &id("G"), root).unwrap(), PathBuf::from("/proj"));
    }

    #[test]
    fn test_group_relative_chain() {
        let mut store = ObjectStore::new();
        store.insert(id("ROOT"), group_with(&["G"], None));
        store.insert(id("G"), group_with(&["F"], Some("lib")));
        store.insert(
            id("F"),
            FileElement::new_file_reference(SourceTree::Group, "a.c", None, None),
        );

        let path = resolve(&store, &id("F"), Path::new("/proj")).unwrap();
        assert_eq!(path, PathBuf::from("/proj/lib/a.c"));
    }

    #[test]
    fn test_group_without_path_is_transparent() {
        let mut store = ObjectStore::new();
        store.insert(id("ROOT"), group_with(&["G"], None));
        store.insert(id("G"), group_with(&["F"], None));
        store.insert(
            id("F"),
            FileElement::new_file_reference(SourceTree::Group, "a.c", None, None),
        );

        let path = resolve(&store, &id("F"), Path::new("/proj")).unwrap();
        assert_eq!(path, PathBuf::from("/proj/a.c"));
    }

    #[test]
    fn test_parentless_group_relative_is_root() {
        let mut store = ObjectStore::new();
        store.insert(id("ROOT"), group_with(&[], Some("ignored")));

        let path = resolve(&store, &id("ROOT"), Path::new("/proj")).unwrap();
        assert_eq!(path, PathBuf::from("/proj"));
    }

    #[test]
    fn test_unspecified_and_other_fail() {
        let mut store = ObjectStore::new();
        let mut unspecified = FileElement::new_file_reference(SourceTree::Group, "a", None, None);
        unspecified.source_tree = None;
        store.insert(id("U"), unspecified);
        store.insert(
            id("O"),
            FileElement::new_file_reference(SourceTree::Other("SDKROOT".into()), "b", None, None),
        );

        for target in ["U", "O"] {
            let err = resolve(&store, &id(target), Path::new("/proj")).unwrap_err();
            assert!(matches!(
                err,
                ProjectError::UnresolvablePath {
                    reason: UnresolvedReason::UnsupportedSourceTree,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_unresolvable_parent_propagates() {
        let mut store = ObjectStore::new();
        let mut parent = group_with(&["F"], Some("lib"));
        parent.source_tree = Some(SourceTree::Other("BUILT_PRODUCTS_DIR".into()));
        store.insert(id("G"), parent);
        store.insert(
            id("F"),
            FileElement::new_file_reference(SourceTree::Group, "a.c", None, None),
        );

        assert!(resolve(&store, &id("F"), Path::new("/proj")).is_err());
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut store = ObjectStore::new();
        store.insert(id("A"), group_with(&["B"], Some("a")));
        store.insert(id("B"), group_with(&["A"], Some("b")));

        let err = resolve(&store, &id("A"), Path::new("/proj")).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::UnresolvablePath {
                reason: UnresolvedReason::Cycle,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_and_non_element() {
        let store = ObjectStore::new();
        assert!(matches!(
            resolve(&store, &id("nope"), Path::new("/proj")),
            Err(ProjectError::UnknownObject { .. })
        ));
    }
}
