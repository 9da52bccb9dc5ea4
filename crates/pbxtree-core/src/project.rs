//! Project session: the object store plus everything needed to resolve and
//! mint objects in it.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::build::{BuildPhase, PhaseKind, ProjectRoot, Target};
use crate::config::SessionConfig;
use crate::error::{ProjectError, Result};
use crate::id::{IdGenerator, ObjectId};
use crate::node::{FileElement, SourceTree};
use crate::resolve;
use crate::store::{Object, ObjectStore};

/// Serializable snapshot of a project: the root object and every object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Identifier of the project root object.
    pub root_object: ObjectId,
    /// All objects.
    pub objects: ObjectStore,
}

/// An exclusively owned editing session over one project tree.
///
/// Every tree operation takes the session explicitly; there is no shared
/// state between sessions.
#[derive(Debug)]
pub struct Project {
    store: ObjectStore,
    root_object: ObjectId,
    source_root: PathBuf,
    ids: Box<dyn IdGenerator>,
}

impl Project {
    /// Create an empty project with a root group and no targets.
    pub fn new(config: &SessionConfig) -> Self {
        let mut ids = config.id_generator();
        let mut store = ObjectStore::new();

        let main_group = ids.generate("main group");
        store.insert(main_group.clone(), FileElement::new_group(SourceTree::Group, None));

        let root_object = ids.generate("project");
        store.insert(root_object.clone(), ProjectRoot::new(main_group));

        Self {
            store,
            root_object,
            source_root: config.source_root.clone(),
            ids,
        }
    }

    /// Open a session over an existing snapshot.
    pub fn from_document(document: ProjectDocument, config: &SessionConfig) -> Result<Self> {
        let project = Self {
            store: document.objects,
            root_object: document.root_object,
            source_root: config.source_root.clone(),
            ids: config.id_generator(),
        };
        project.root_group()?;
        Ok(project)
    }

    /// Snapshot the current tree.
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            root_object: self.root_object.clone(),
            objects: self.store.clone(),
        }
    }

    /// Read access to the object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Write access to the object store.
    ///
    /// Callers inserting objects directly bypass identifier minting; prefer
    /// [`Project::mint`].
    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    /// Identifier of the project root object.
    pub fn root_object(&self) -> &ObjectId {
        &self.root_object
    }

    /// Directory that relative paths resolve against.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Insert `object` under a freshly generated identifier.
    ///
    /// The generator is re-drawn until it yields an identifier not already
    /// in the store.
    pub fn mint(&mut self, kind_hint: &str, object: impl Into<Object>) -> ObjectId {
        let id = loop {
            let candidate = self.ids.generate(kind_hint);
            if !self.store.contains(&candidate) {
                break candidate;
            }
            trace!(id = %candidate, "identifier collision, regenerating");
        };
        self.store.insert(id.clone(), object);
        id
    }

    /// Identifier of the root group.
    pub fn root_group(&self) -> Result<ObjectId> {
        let root = self
            .store
            .project(&self.root_object)
            .ok_or(ProjectError::NoRootGroup)?;
        if self.store.group(&root.main_group).is_none() {
            return Err(ProjectError::NoRootGroup);
        }
        Ok(root.main_group.clone())
    }

    /// First target (in store order) with the given name.
    pub fn target_named(&self, name: &str) -> Result<ObjectId> {
        self.store
            .targets()
            .find(|(_, target)| target.name == name)
            .map(|(id, _)| id.clone())
            .ok_or_else(|| ProjectError::TargetNotFound {
                name: CompactString::from(name),
            })
    }

    /// The sources phase of a target: the first of its phases, in the
    /// target's order, that is a sources phase.
    pub fn sources_build_phase(&self, target: &ObjectId) -> Result<Option<ObjectId>> {
        let target = self.require_target(target)?;
        Ok(target
            .build_phases
            .iter()
            .find(|id| self.store.build_phase(id).is_some_and(BuildPhase::is_sources))
            .cloned())
    }

    /// Register a new target on the project root object.
    pub fn add_target(&mut self, name: impl Into<CompactString>) -> Result<ObjectId> {
        let target = Target::new(name);
        let hint = target.name.clone();
        let id = self.mint(&hint, target);
        match self.store.get_mut(&self.root_object) {
            Some(Object::Project(root)) => root.targets.push(id.clone()),
            _ => return Err(ProjectError::NoRootGroup),
        }
        Ok(id)
    }

    /// Append a new, empty build phase to a target.
    pub fn add_build_phase(&mut self, target: &ObjectId, kind: PhaseKind) -> Result<ObjectId> {
        self.require_target(target)?;
        let id = self.mint(&kind.to_string(), BuildPhase::new(kind));
        if let Some(Object::Target(target)) = self.store.get_mut(target) {
            target.build_phases.push(id.clone());
        }
        Ok(id)
    }

    /// Resolve the absolute path of an element.
    pub fn resolve(&self, id: &ObjectId) -> Result<PathBuf> {
        resolve::resolve(&self.store, id, &self.source_root)
    }

    fn require_target(&self, id: &ObjectId) -> Result<&Target> {
        match self.store.get(id) {
            Some(Object::Target(target)) => Ok(target),
            Some(_) => Err(ProjectError::NotATarget { id: id.clone() }),
            None => Err(ProjectError::unknown(id)),
        }
    }
}
