//! File kind inference for new file references.

use std::path::Path;

use pbxtree_core::FileKind;

/// Infers the file kind recorded on a new file reference.
pub trait FileClassifier: Send + Sync {
    /// Classify the file at `path`. `None` leaves the kind unset.
    fn classify(&self, path: &Path) -> Option<FileKind>;
}

impl<F> FileClassifier for F
where
    F: Fn(&Path) -> Option<FileKind> + Send + Sync,
{
    fn classify(&self, path: &Path) -> Option<FileKind> {
        self(path)
    }
}

/// Classifier naming the kind after the lowercased file extension,
/// e.g. `file.swift`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl FileClassifier for ExtensionClassifier {
    fn classify(&self, path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Some(FileKind::new(format!("file.{ext}")))
    }
}
