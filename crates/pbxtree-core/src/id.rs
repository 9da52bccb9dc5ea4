//! Object identifiers and identifier generation.

use std::fmt;

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};

/// Opaque identifier of an object in the store.
///
/// Identifiers are minted once and never reassigned. Their textual form
/// carries no meaning beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(CompactString);

impl ObjectId {
    /// Create an identifier from its textual form.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Source of fresh identifiers for newly created objects.
///
/// Implementations only need to be unique per generator; the project
/// session re-draws on collision with an identifier already in the store.
pub trait IdGenerator: Send + fmt::Debug {
    /// Produce a new identifier. `kind_hint` names what is being created
    /// (e.g. a group path segment or a file path).
    fn generate(&mut self, kind_hint: &str) -> ObjectId;
}

/// Counter-backed generator producing 24 hex digit identifiers.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdGenerator for SequentialIds {
    fn generate(&mut self, _kind_hint: &str) -> ObjectId {
        self.next += 1;
        ObjectId(format_compact!("{:024X}", self.next))
    }
}

/// Generator deriving identifiers from a BLAKE3 hash of a seed, a counter
/// and the kind hint.
#[derive(Debug, Clone)]
pub struct HashedIds {
    seed: u64,
    counter: u64,
}

impl HashedIds {
    /// Number of hash bytes kept in an identifier.
    const ID_BYTES: usize = 12;

    /// Create a generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }
}

impl IdGenerator for HashedIds {
    fn generate(&mut self, kind_hint: &str) -> ObjectId {
        self.counter += 1;

        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(&self.counter.to_le_bytes());
        hasher.update(kind_hint.as_bytes());
        let hash = hasher.finalize();

        let mut id = CompactString::with_capacity(Self::ID_BYTES * 2);
        for byte in &hash.as_bytes()[..Self::ID_BYTES] {
            id.push_str(&format_compact!("{byte:02X}"));
        }
        ObjectId(id)
    }
}
