//! Identifier-keyed object arena.
//!
//! The store owns every object for its full lifetime. Relations between
//! objects (`children`, `files`, `build_phases`) are identifier lookups,
//! never ownership. Iteration follows insertion order, which makes every
//! "first match" scan over the store deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::build::{BuildFile, BuildPhase, ProjectRoot, Target};
use crate::error::{ProjectError, Result};
use crate::id::ObjectId;
use crate::node::FileElement;

/// Any object that can live in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "isa", rename_all = "snake_case")]
pub enum Object {
    /// Group or file reference.
    Element(FileElement),
    /// Membership of a file reference in a build phase.
    BuildFile(BuildFile),
    /// Build phase of a target.
    BuildPhase(BuildPhase),
    /// Build target.
    Target(Target),
    /// Project root object.
    Project(ProjectRoot),
}

impl Object {
    /// Get the file element, if this is one.
    pub fn as_element(&self) -> Option<&FileElement> {
        match self {
            Object::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get the group, if this is a group element.
    pub fn as_group(&self) -> Option<&FileElement> {
        self.as_element().filter(|e| e.is_group())
    }

    /// Get the file reference, if this is a file reference element.
    pub fn as_file_reference(&self) -> Option<&FileElement> {
        self.as_element().filter(|e| e.is_file_reference())
    }
}

impl From<FileElement> for Object {
    fn from(value: FileElement) -> Self {
        Object::Element(value)
    }
}

impl From<BuildFile> for Object {
    fn from(value: BuildFile) -> Self {
        Object::BuildFile(value)
    }
}

impl From<BuildPhase> for Object {
    fn from(value: BuildPhase) -> Self {
        Object::BuildPhase(value)
    }
}

impl From<Target> for Object {
    fn from(value: Target) -> Self {
        Object::Target(value)
    }
}

impl From<ProjectRoot> for Object {
    fn from(value: ProjectRoot) -> Self {
        Object::Project(value)
    }
}

/// Arena of all project objects keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectStore {
    objects: IndexMap<ObjectId, Object>,
}

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects in the store.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Check if an identifier is present.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Insert an object under the given identifier, returning the object it
    /// replaced, if any.
    pub fn insert(&mut self, id: ObjectId, object: impl Into<Object>) -> Option<Object> {
        self.objects.insert(id, object.into())
    }

    /// Look up an object.
    pub fn get(&self, id: &ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Look up an object mutably.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Iterate over all objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &Object)> {
        self.objects.iter()
    }

    /// Look up a file element (group or file reference).
    pub fn element(&self, id: &ObjectId) -> Option<&FileElement> {
        self.get(id).and_then(Object::as_element)
    }

    /// Look up a group.
    pub fn group(&self, id: &ObjectId) -> Option<&FileElement> {
        self.get(id).and_then(Object::as_group)
    }

    /// Look up a group mutably.
    pub fn group_mut(&mut self, id: &ObjectId) -> Option<&mut FileElement> {
        match self.get_mut(id) {
            Some(Object::Element(element)) if element.is_group() => Some(element),
            _ => None,
        }
    }

    /// Look up a group, distinguishing a missing id from a non-group.
    pub fn require_group(&self, id: &ObjectId) -> Result<&FileElement> {
        match self.get(id) {
            Some(Object::Element(element)) if element.is_group() => Ok(element),
            Some(_) => Err(ProjectError::NotAGroup { id: id.clone() }),
            None => Err(ProjectError::unknown(id)),
        }
    }

    /// Look up a file reference.
    pub fn file_reference(&self, id: &ObjectId) -> Option<&FileElement> {
        self.get(id).and_then(Object::as_file_reference)
    }

    /// Look up a build file.
    pub fn build_file(&self, id: &ObjectId) -> Option<&BuildFile> {
        match self.get(id) {
            Some(Object::BuildFile(build_file)) => Some(build_file),
            _ => None,
        }
    }

    /// Look up a build phase.
    pub fn build_phase(&self, id: &ObjectId) -> Option<&BuildPhase> {
        match self.get(id) {
            Some(Object::BuildPhase(phase)) => Some(phase),
            _ => None,
        }
    }

    /// Look up a build phase mutably.
    pub fn build_phase_mut(&mut self, id: &ObjectId) -> Option<&mut BuildPhase> {
        match self.get_mut(id) {
            Some(Object::BuildPhase(phase)) => Some(phase),
            _ => None,
        }
    }

    /// Look up a target.
    pub fn target(&self, id: &ObjectId) -> Option<&Target> {
        match self.get(id) {
            Some(Object::Target(target)) => Some(target),
            _ => None,
        }
    }

    /// Look up a project root object.
    pub fn project(&self, id: &ObjectId) -> Option<&ProjectRoot> {
        match self.get(id) {
            Some(Object::Project(project)) => Some(project),
            _ => None,
        }
    }

    /// All groups in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = (&ObjectId, &FileElement)> {
        self.iter()
            .filter_map(|(id, object)| object.as_group().map(|g| (id, g)))
    }

    /// All file references in insertion order.
    pub fn file_references(&self) -> impl Iterator<Item = (&ObjectId, &FileElement)> {
        self.iter()
            .filter_map(|(id, object)| object.as_file_reference().map(|f| (id, f)))
    }

    /// All build files in insertion order.
    pub fn build_files(&self) -> impl Iterator<Item = (&ObjectId, &BuildFile)> {
        self.iter().filter_map(|(id, object)| match object {
            Object::BuildFile(build_file) => Some((id, build_file)),
            _ => None,
        })
    }

    /// All build phases in insertion order.
    pub fn build_phases(&self) -> impl Iterator<Item = (&ObjectId, &BuildPhase)> {
        self.iter().filter_map(|(id, object)| match object {
            Object::BuildPhase(phase) => Some((id, phase)),
            _ => None,
        })
    }

    /// All targets in insertion order.
    pub fn targets(&self) -> impl Iterator<Item = (&ObjectId, &Target)> {
        self.iter().filter_map(|(id, object)| match object {
            Object::Target(target) => Some((id, target)),
            _ => None,
        })
    }

    /// First group (in insertion order) listing `child` among its children.
    pub fn parent_of(&self, child: &ObjectId) -> Option<(&ObjectId, &FileElement)> {
        self.groups().find(|(_, group)| group.contains_child(child))
    }

    /// Identifiers referenced from `children`, `files`, `file_ref`,
    /// `build_phases`, `main_group` or `targets` that are not in the store.
    pub fn dangling_references(&self) -> Vec<ObjectId> {
        let mut dangling = Vec::new();
        for (_, object) in self.iter() {
            let referenced: Vec<&ObjectId> = match object {
                Object::Element(element) => element.children().iter().collect(),
                Object::BuildFile(build_file) => vec![&build_file.file_ref],
                Object::BuildPhase(phase) => phase.files.iter().collect(),
                Object::Target(target) => target.build_phases.iter().collect(),
                Object::Project(project) => std::iter::once(&project.main_group)
                    .chain(project.targets.iter())
                    .collect(),
            };
            dangling.extend(
                referenced
                    .into_iter()
                    .filter(|id| !self.contains(id))
                    .cloned(),
            );
        }
        dangling
    }
}
