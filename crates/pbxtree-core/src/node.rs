//! Group and file reference node types.

use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// How a node's `path` is anchored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTree {
    /// `path` is already a complete filesystem path.
    Absolute,
    /// `path` is relative to the project's source root.
    SourceRoot,
    /// `path` is relative to the enclosing group.
    Group,
    /// Any other anchor (build products, SDK, custom variables).
    Other(CompactString),
}

impl fmt::Display for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTree::Absolute => f.write_str("<absolute>"),
            SourceTree::SourceRoot => f.write_str("SOURCE_ROOT"),
            SourceTree::Group => f.write_str("<group>"),
            SourceTree::Other(other) => f.write_str(other),
        }
    }
}

impl FromStr for SourceTree {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "<absolute>" | "absolute" => SourceTree::Absolute,
            "SOURCE_ROOT" | "source-root" => SourceTree::SourceRoot,
            "<group>" | "group" => SourceTree::Group,
            other => SourceTree::Other(other.into()),
        })
    }
}

/// Inferred file type of a file reference. Opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileKind(pub CompactString);

impl FileKind {
    /// Create a new file kind.
    pub fn new(kind: impl Into<CompactString>) -> Self {
        Self(kind.into())
    }

    /// Get the kind as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Variant-specific payload of a file element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Logical folder holding child identifiers in display order.
    Group { children: Vec<ObjectId> },
    /// Leaf node for one concrete file.
    FileReference { file_kind: Option<FileKind> },
}

/// A node of the project tree: either a group or a file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileElement {
    /// Anchoring mode (None = unspecified).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tree: Option<SourceTree>,

    /// Relative path segment or absolute path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<CompactString>,

    /// Display name, independent of `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<CompactString>,

    /// Group or file reference payload.
    pub kind: ElementKind,
}

impl FileElement {
    /// Create a new group with no children.
    pub fn new_group(source_tree: SourceTree, path: Option<CompactString>) -> Self {
        Self {
            source_tree: Some(source_tree),
            path,
            name: None,
            kind: ElementKind::Group {
                children: Vec::new(),
            },
        }
    }

    /// Create a new file reference.
    pub fn new_file_reference(
        source_tree: SourceTree,
        path: impl Into<CompactString>,
        name: Option<CompactString>,
        file_kind: Option<FileKind>,
    ) -> Self {
        Self {
            source_tree: Some(source_tree),
            path: Some(path.into()),
            name,
            kind: ElementKind::FileReference { file_kind },
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<CompactString>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check if this element is a group.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group { .. })
    }

    /// Check if this element is a file reference.
    pub fn is_file_reference(&self) -> bool {
        matches!(self.kind, ElementKind::FileReference { .. })
    }

    /// Children of a group, empty for file references.
    pub fn children(&self) -> &[ObjectId] {
        match &self.kind {
            ElementKind::Group { children } => children,
            ElementKind::FileReference { .. } => &[],
        }
    }

    /// Mutable children of a group.
    pub fn children_mut(&mut self) -> Option<&mut Vec<ObjectId>> {
        match &mut self.kind {
            ElementKind::Group { children } => Some(children),
            ElementKind::FileReference { .. } => None,
        }
    }

    /// Check whether `id` is a direct child of this element.
    pub fn contains_child(&self, id: &ObjectId) -> bool {
        self.children().contains(id)
    }

    /// File kind of a file reference.
    pub fn file_kind(&self) -> Option<&FileKind> {
        match &self.kind {
            ElementKind::FileReference { file_kind } => file_kind.as_ref(),
            ElementKind::Group { .. } => None,
        }
    }

    /// The raw path, treating an empty string as absent.
    pub fn path_str(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Check whether a path segment names this element, by name or by path.
    pub fn matches_segment(&self, segment: &str) -> bool {
        self.name.as_deref() == Some(segment) || self.path.as_deref() == Some(segment)
    }

    /// Name shown for this element: `name`, falling back to the last
    /// component of `path`.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.path_str().map(|p| p.rsplit('/').next().unwrap_or(p)))
    }
}
