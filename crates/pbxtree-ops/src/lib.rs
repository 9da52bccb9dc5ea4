//! Tree mutation engine for pbxtree.
//!
//! This crate provides the idempotent operations on a project tree:
//!
//! - **Group lookup/creation** - follow a slash-delimited path from a group,
//!   creating missing segments
//! - **File attachment** - place a file into a group and a target's sources
//!   phase without duplicating references, build files or group children
//! - **Source listing** - resolve the paths a target compiles
//!
//! ```rust,ignore
//! use pbxtree_core::{PhaseKind, Project, SessionConfig};
//! use pbxtree_ops::{FileAttacher, locate_or_create};
//!
//! let mut project = Project::new(&SessionConfig::new("/proj"));
//! let app = project.add_target("App")?;
//! project.add_build_phase(&app, PhaseKind::Sources)?;
//!
//! let group = locate_or_create(&mut project, "Sources/Generated", None)?;
//! FileAttacher::new().attach(&mut project, "/proj/gen/Model.swift".as_ref(), &group, &app)?;
//! ```

mod attach;
mod classify;
mod locate;
mod sources;

pub use attach::{AttachConfig, AttachConfigBuilder, AttachOutcome, FileAttacher};
pub use classify::{ExtensionClassifier, FileClassifier};
pub use locate::{locate, locate_or_create};
pub use sources::source_file_paths;

// Re-export core types
pub use pbxtree_core::{ObjectId, Project, ProjectError};
