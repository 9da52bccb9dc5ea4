//! Error types for tree operations.

use std::path::PathBuf;

use compact_str::CompactString;
use thiserror::Error;

use crate::id::ObjectId;

/// Errors that can occur while reading or mutating a project tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// A node's path cannot be resolved to a filesystem location.
    #[error("Cannot resolve path of {id}: {reason}")]
    UnresolvablePath { id: ObjectId, reason: UnresolvedReason },

    /// The target has no sources phase to attach files to.
    #[error("Target {target} has no sources build phase")]
    MissingBuildPhase { target: ObjectId },

    /// Identifier is not present in the store.
    #[error("Unknown object: {id}")]
    UnknownObject { id: ObjectId },

    /// Identifier exists but is not a group.
    #[error("Object is not a group: {id}")]
    NotAGroup { id: ObjectId },

    /// Identifier exists but is not a target.
    #[error("Object is not a target: {id}")]
    NotATarget { id: ObjectId },

    /// The root object does not lead to a root group.
    #[error("Project has no root group")]
    NoRootGroup,

    /// No target carries the requested name.
    #[error("Target not found: {name}")]
    TargetNotFound { name: CompactString },

    /// File paths are stored as strings and must be valid UTF-8.
    #[error("Path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ProjectError {
    /// Create an unresolvable path error.
    pub fn unresolvable(id: &ObjectId, reason: UnresolvedReason) -> Self {
        Self::UnresolvablePath {
            id: id.clone(),
            reason,
        }
    }

    /// Create an unknown object error.
    pub fn unknown(id: &ObjectId) -> Self {
        Self::UnknownObject { id: id.clone() }
    }
}

/// Why a path could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnresolvedReason {
    /// Anchoring mode is unspecified or not a filesystem anchor.
    #[error("unsupported source tree")]
    UnsupportedSourceTree,
    /// An absolute node has no path.
    #[error("absolute element has no path")]
    EmptyAbsolutePath,
    /// The node is not a file element.
    #[error("not a file element")]
    NotAnElement,
    /// The parent chain loops back on itself.
    #[error("group chain contains a cycle")]
    Cycle,
}

/// Result alias for tree operations.
pub type Result<T, E = ProjectError> = std::result::Result<T, E>;
