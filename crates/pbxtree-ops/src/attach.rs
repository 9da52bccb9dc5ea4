//! Idempotent attachment of files to groups and sources phases.
//!
//! Attaching a file makes sure that:
//!
//! 1. exactly one file reference in the whole store carries the file's path
//!    (an existing one is reused, otherwise one is created together with a
//!    build file in the target's sources phase), and
//! 2. the destination group lists that reference among its children at most
//!    once.
//!
//! The reference check is global while the group check is per group, so
//! the same file can be linked into several groups. A group-relative
//! reference found only through its resolved path stays in its own group:
//! linking it elsewhere would change what it resolves to.

use std::path::Path;

use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pbxtree_core::{
    BuildFile, FileElement, ObjectId, Project, ProjectError, Result, SourceTree, resolve_element,
};

use crate::classify::{ExtensionClassifier, FileClassifier};

/// Configuration for file attachment.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct AttachConfig {
    /// Also treat a file reference as the same file when its resolved
    /// absolute path equals the attached path (not only its raw path).
    #[builder(default = "false")]
    pub match_resolved_paths: bool,
}

impl Default for AttachConfig {
    fn default() -> Self {
        Self {
            match_resolved_paths: false,
        }
    }
}

impl AttachConfig {
    /// Create a new config builder.
    pub fn builder() -> AttachConfigBuilder {
        AttachConfigBuilder::default()
    }
}

/// What an [`FileAttacher::attach`] call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachOutcome {
    /// The file reference now representing the file.
    pub file_reference: ObjectId,
    /// Build file created for a new reference.
    pub build_file: Option<ObjectId>,
    /// Whether the file reference was newly created.
    pub created: bool,
    /// Whether the reference was appended to the destination group.
    pub linked: bool,
}

impl AttachOutcome {
    /// Check if the call left the tree unchanged.
    pub fn is_noop(&self) -> bool {
        !self.created && !self.linked
    }
}

/// A reused file reference.
struct Existing {
    id: ObjectId,
    /// Matched only by resolved path and anchored to its parent group.
    anchored: bool,
}

/// Places files into groups and build phases without creating duplicates.
pub struct FileAttacher {
    config: AttachConfig,
    classifier: Box<dyn FileClassifier>,
}

impl Default for FileAttacher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FileAttacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttacher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FileAttacher {
    /// Create an attacher with default config and extension-based
    /// classification.
    pub fn new() -> Self {
        Self::with_config(AttachConfig::default())
    }

    /// Create an attacher with custom config.
    pub fn with_config(config: AttachConfig) -> Self {
        Self {
            config,
            classifier: Box::new(ExtensionClassifier),
        }
    }

    /// Replace the file kind classifier.
    pub fn with_classifier(mut self, classifier: impl FileClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Ensure `file_path` is represented by a file reference, built in the
    /// sources phase of `target`, and listed in `group`.
    ///
    /// Fails with [`ProjectError::MissingBuildPhase`] when the target has no
    /// sources phase and with [`ProjectError::NonUtf8Path`] when `file_path`
    /// is not valid UTF-8; nothing is mutated in either case.
    pub fn attach(
        &self,
        project: &mut Project,
        file_path: &Path,
        group: &ObjectId,
        target: &ObjectId,
    ) -> Result<AttachOutcome> {
        let phase = project
            .sources_build_phase(target)?
            .ok_or_else(|| ProjectError::MissingBuildPhase {
                target: target.clone(),
            })?;
        project.store().require_group(group)?;

        let path = file_path
            .to_str()
            .map(CompactString::from)
            .ok_or_else(|| ProjectError::NonUtf8Path {
                path: file_path.to_path_buf(),
            })?;

        let mut anchored_elsewhere = false;
        let (file_reference, build_file) = match self.find_existing(project, &path) {
            Some(Existing { id, anchored }) => {
                anchored_elsewhere = anchored;
                (id, None)
            }
            None => {
                let (file_reference, build_file) = self.create_reference(project, file_path, &path);
                project
                    .store_mut()
                    .build_phase_mut(&phase)
                    .ok_or_else(|| ProjectError::MissingBuildPhase {
                        target: target.clone(),
                    })?
                    .files
                    .push(build_file.clone());
                debug!(
                    path = %path,
                    file_ref = %file_reference,
                    build_file = %build_file,
                    phase = %phase,
                    "created file reference"
                );
                (file_reference, Some(build_file))
            }
        };

        let linked = !anchored_elsewhere && !self.group_lists_file(project, group, &path);
        if linked {
            project
                .store_mut()
                .group_mut(group)
                .and_then(FileElement::children_mut)
                .ok_or_else(|| ProjectError::NotAGroup { id: group.clone() })?
                .push(file_reference.clone());
            debug!(path = %path, file_ref = %file_reference, group = %group, "linked file into group");
        }

        Ok(AttachOutcome {
            file_reference,
            created: build_file.is_some(),
            build_file,
            linked,
        })
    }

    fn create_reference(
        &self,
        project: &mut Project,
        file_path: &Path,
        path: &CompactString,
    ) -> (ObjectId, ObjectId) {
        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(CompactString::from);
        let kind = self.classifier.classify(file_path);

        let reference =
            FileElement::new_file_reference(SourceTree::Absolute, path.clone(), name, kind);
        let file_reference = project.mint(path, reference);
        let build_file = project.mint(path, BuildFile::new(file_reference.clone()));
        (file_reference, build_file)
    }

    /// First file reference in store order that is `path`.
    fn find_existing(&self, project: &Project, path: &str) -> Option<Existing> {
        project
            .store()
            .file_references()
            .find(|(id, element)| self.is_same_file(project, id, element, path))
            .map(|(id, element)| Existing {
                id: id.clone(),
                anchored: element.path.as_deref() != Some(path)
                    && element.source_tree != Some(SourceTree::Absolute),
            })
    }

    /// Check whether any file reference child of `group` is `path`.
    fn group_lists_file(&self, project: &Project, group: &ObjectId, path: &str) -> bool {
        let store = project.store();
        store.group(group).is_some_and(|group| {
            group.children().iter().any(|child| {
                store
                    .file_reference(child)
                    .is_some_and(|element| self.is_same_file(project, child, element, path))
            })
        })
    }

    fn is_same_file(&self, project: &Project, id: &ObjectId, element: &FileElement, path: &str) -> bool {
        if element.path.as_deref() == Some(path) {
            return true;
        }
        self.config.match_resolved_paths
            && resolve_element(project.store(), element, id, project.source_root())
                .is_ok_and(|resolved| resolved == Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbxtree_core::{FileKind, IdStrategy, PhaseKind, SessionConfig};

    fn resolving_attacher() -> FileAttacher {
        let config = AttachConfig::builder().match_resolved_paths(true).build().unwrap();
        FileAttacher::with_config(config)
    }

    fn setup() -> (Project, ObjectId, ObjectId) {
        let config = SessionConfig::builder()
            .source_root("/proj")
            .id_strategy(IdStrategy::Sequential)
            .build()
            .unwrap();
        let mut project = Project::new(&config);
        let target = project.add_target("App").unwrap();
        project.add_build_phase(&target, PhaseKind::Sources).unwrap();
        let root = project.root_group().unwrap();
        (project, root, target)
    }

    #[test]
    fn test_new_reference_fields() {
        let (mut project, root, target) = setup();
        let outcome = FileAttacher::new()
            .attach(&mut project, Path::new("/x/Model.swift"), &root, &target)
            .unwrap();

        assert!(outcome.created);
        assert!(outcome.linked);
        let element = project.store().file_reference(&outcome.file_reference).unwrap();
        assert_eq!(element.source_tree, Some(SourceTree::Absolute));
        assert_eq!(element.path.as_deref(), Some("/x/Model.swift"));
        assert_eq!(element.name.as_deref(), Some("Model.swift"));
        assert_eq!(element.file_kind().map(FileKind::as_str), Some("file.swift"));

        let build_file = project.store().build_file(outcome.build_file.as_ref().unwrap()).unwrap();
        assert_eq!(build_file.file_ref, outcome.file_reference);
    }

    #[test]
    fn test_second_attach_is_noop() {
        let (mut project, root, target) = setup();
        let attacher = FileAttacher::new();
        let first = attacher
            .attach(&mut project, Path::new("/x/a.c"), &root, &target)
            .unwrap();
        let before = project.to_document();
        let second = attacher
            .attach(&mut project, Path::new("/x/a.c"), &root, &target)
            .unwrap();

        assert!(second.is_noop());
        assert_eq!(second.file_reference, first.file_reference);
        assert_eq!(project.to_document(), before);
    }

    #[test]
    fn test_custom_classifier() {
        let (mut project, root, target) = setup();
        let attacher = FileAttacher::new().with_classifier(|_: &Path| Some(FileKind::new("opaque")));
        let outcome = attacher
            .attach(&mut project, Path::new("/x/README"), &root, &target)
            .unwrap();

        let element = project.store().file_reference(&outcome.file_reference).unwrap();
        assert_eq!(element.file_kind().map(FileKind::as_str), Some("opaque"));
    }

    #[test]
    fn test_resolved_path_matches_existing_group_relative_reference() {
        let (mut project, root, target) = setup();
        let existing = project.mint(
            "a.c",
            FileElement::new_file_reference(SourceTree::Group, "a.c", None, None),
        );
        project
            .store_mut()
            .group_mut(&root)
            .unwrap()
            .children_mut()
            .unwrap()
            .push(existing.clone());

        let outcome = resolving_attacher()
            .attach(&mut project, Path::new("/proj/a.c"), &root, &target)
            .unwrap();
        assert_eq!(outcome.file_reference, existing);
        assert!(outcome.is_noop());
    }

    #[test]
    fn test_raw_path_only_matching() {
        let (mut project, root, target) = setup();
        let existing = project.mint(
            "a.c",
            FileElement::new_file_reference(SourceTree::Group, "a.c", None, None),
        );
        project
            .store_mut()
            .group_mut(&root)
            .unwrap()
            .children_mut()
            .unwrap()
            .push(existing.clone());

        let outcome = FileAttacher::new()
            .attach(&mut project, Path::new("/proj/a.c"), &root, &target)
            .unwrap();
        assert_ne!(outcome.file_reference, existing);
        assert!(outcome.created);
    }

    /// Groups `y` then `x` under the root, with a group-relative `a.c` in `x`.
    fn setup_sibling_groups() -> (Project, ObjectId, ObjectId, ObjectId) {
        let (mut project, root, target) = setup();
        let y = crate::locate_or_create(&mut project, "y", None).unwrap();
        let x = crate::locate_or_create(&mut project, "x", None).unwrap();
        let existing = project.mint(
            "a.c",
            FileElement::new_file_reference(SourceTree::Group, "a.c", None, None),
        );
        project
            .store_mut()
            .group_mut(&x)
            .unwrap()
            .children_mut()
            .unwrap()
            .push(existing.clone());
        (project, y, target, existing)
    }

    #[test]
    fn test_resolved_match_stays_in_its_group() {
        let (mut project, y, target, existing) = setup_sibling_groups();
        let attacher = resolving_attacher();

        let first = attacher
            .attach(&mut project, Path::new("/proj/x/a.c"), &y, &target)
            .unwrap();
        assert_eq!(first.file_reference, existing);
        assert!(first.is_noop());
        assert!(!project.store().group(&y).unwrap().contains_child(&existing));
        assert_eq!(
            project.resolve(&existing).unwrap(),
            std::path::PathBuf::from("/proj/x/a.c")
        );

        let before = project.to_document();
        let second = attacher
            .attach(&mut project, Path::new("/proj/x/a.c"), &y, &target)
            .unwrap();
        assert!(second.is_noop());
        assert_eq!(project.to_document(), before);
        assert_eq!(project.store().file_references().count(), 1);
        assert_eq!(project.store().build_files().count(), 0);
    }

    #[test]
    fn test_raw_matching_adds_absolute_reference_once() {
        let (mut project, y, target, existing) = setup_sibling_groups();
        let attacher = FileAttacher::new();

        let first = attacher
            .attach(&mut project, Path::new("/proj/x/a.c"), &y, &target)
            .unwrap();
        assert!(first.created);
        assert!(first.linked);
        assert_ne!(first.file_reference, existing);
        assert_eq!(
            project.resolve(&existing).unwrap(),
            std::path::PathBuf::from("/proj/x/a.c")
        );

        let second = attacher
            .attach(&mut project, Path::new("/proj/x/a.c"), &y, &target)
            .unwrap();
        assert!(second.is_noop());
        assert_eq!(second.file_reference, first.file_reference);
        assert_eq!(project.store().file_references().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (mut project, root, target) = setup();
        let count = project.store().len();
        let path = Path::new(OsStr::from_bytes(b"/x/\xff.c"));
        let err = FileAttacher::new()
            .attach(&mut project, path, &root, &target)
            .unwrap_err();

        assert!(matches!(err, ProjectError::NonUtf8Path { .. }));
        assert_eq!(project.store().len(), count);
    }

    #[test]
    fn test_destination_must_be_group() {
        let (mut project, _root, target) = setup();
        let count = project.store().len();
        let err = FileAttacher::new()
            .attach(&mut project, Path::new("/x/a.c"), &target, &target)
            .unwrap_err();

        assert!(matches!(err, ProjectError::NotAGroup { .. }));
        assert_eq!(project.store().len(), count);
    }
}
