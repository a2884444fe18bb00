//! Folder creation.

use std::fs;
use std::io::ErrorKind;

use tracing::info;

use dirserve_core::{PathGuard, ServeError};

use crate::operation::{MutationOutcome, MutationReport};

/// Create a single folder under an existing, contained parent.
///
/// Missing intermediate folders are not created: the parent must already
/// resolve inside the root.
pub fn create_folder(guard: &PathGuard, request: &str) -> Result<MutationReport, ServeError> {
    let (parent, name) = guard.resolve_parent(request)?;
    let target = parent.as_path().join(&name);

    match fs::create_dir(&target) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(ServeError::conflict(request));
        }
        Err(e) => return Err(ServeError::io(request, e)),
    }

    let path = join_relative(parent.relative(), &name);
    info!(path = %path, "Created folder");
    Ok(MutationReport::new(path, MutationOutcome::Created))
}

/// Join a root-relative parent and a child name.
pub(crate) fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}
