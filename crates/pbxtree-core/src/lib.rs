//! Core types for pbxtree.
//!
//! This crate provides the in-memory project tree: an identifier-keyed
//! object store holding groups, file references, build files, build phases
//! and targets, plus absolute path resolution for tree nodes.

mod build;
mod config;
mod error;
mod id;
mod node;
mod project;
pub mod resolve;
mod store;

pub use build::{BuildFile, BuildPhase, PhaseKind, ProjectRoot, Target};
pub use config::{IdStrategy, SessionConfig, SessionConfigBuilder};
pub use error::{ProjectError, Result, UnresolvedReason};
pub use id::{HashedIds, IdGenerator, ObjectId, SequentialIds};
pub use node::{ElementKind, FileElement, FileKind, SourceTree};
pub use project::{Project, ProjectDocument};
pub use resolve::{resolve, resolve_element};
pub use store::{Object, ObjectStore};
