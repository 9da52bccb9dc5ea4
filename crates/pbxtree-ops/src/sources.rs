//! Source file listing for targets.

use std::path::PathBuf;

use tracing::trace;

use pbxtree_core::{ObjectId, Project, Result};

/// Resolved paths of the files built in a target's sources phase, in build
/// order.
///
/// Build files whose reference is missing or unresolvable are skipped.
/// A target without a sources phase yields an empty list.
pub fn source_file_paths(project: &Project, target: &ObjectId) -> Result<Vec<PathBuf>> {
    let Some(phase_id) = project.sources_build_phase(target)? else {
        return Ok(Vec::new());
    };
    let store = project.store();
    let Some(phase) = store.build_phase(&phase_id) else {
        return Ok(Vec::new());
    };

    let paths = phase
        .files
        .iter()
        .filter_map(|build_file| store.build_file(build_file))
        .filter_map(|build_file| match project.resolve(&build_file.file_ref) {
            Ok(path) => Some(path),
            Err(err) => {
                trace!(file_ref = %build_file.file_ref, %err, "skipping source file");
                None
            }
        })
        .collect();

    Ok(paths)
}
