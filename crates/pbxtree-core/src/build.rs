//! Build phases, build files, targets and the project root object.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::id::ObjectId;

/// A file participating in a build phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFile {
    /// The wrapped file reference.
    pub file_ref: ObjectId,
}

impl BuildFile {
    /// Wrap a file reference.
    pub fn new(file_ref: ObjectId) -> Self {
        Self { file_ref }
    }
}

/// Kind of build phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PhaseKind {
    Sources,
    Resources,
    Frameworks,
    Headers,
    CopyFiles,
    ShellScript,
}

/// An ordered collection of build files for one build step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPhase {
    /// What this phase does.
    pub kind: PhaseKind,
    /// Build file identifiers in build order.
    #[serde(default)]
    pub files: Vec<ObjectId>,
}

impl BuildPhase {
    /// Create an empty phase.
    pub fn new(kind: PhaseKind) -> Self {
        Self {
            kind,
            files: Vec::new(),
        }
    }

    /// Check if this is the sources phase.
    pub fn is_sources(&self) -> bool {
        self.kind == PhaseKind::Sources
    }
}

/// A build target owning a set of build phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target name.
    pub name: CompactString,
    /// Build phase identifiers.
    #[serde(default)]
    pub build_phases: Vec<ObjectId>,
}

impl Target {
    /// Create a target with no phases.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            build_phases: Vec::new(),
        }
    }
}

/// The project's root object, anchoring the main group and targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoot {
    /// Root group of the tree.
    pub main_group: ObjectId,
    /// Targets in declaration order.
    #[serde(default)]
    pub targets: Vec<ObjectId>,
}

impl ProjectRoot {
    /// Create a root object for the given main group.
    pub fn new(main_group: ObjectId) -> Self {
        Self {
            main_group,
            targets: Vec::new(),
        }
    }
}
