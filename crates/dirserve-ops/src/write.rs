//! Atomic file writes: replace and upload.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::info;

use dirserve_core::{PathGuard, ResolvedPath, ServeError, validate_name};

use crate::create::join_relative;
use crate::operation::{MutationOutcome, MutationReport, UploadedFile};

const TEMP_PREFIX: &str = ".dirserve-";

/// Create or replace the file at a request path.
///
/// The new content is written to a temporary file next to the target and
/// renamed over it, so readers see either the old content or the new one.
pub fn replace_file(
    guard: &PathGuard,
    request: &str,
    content: &[u8],
) -> Result<MutationReport, ServeError> {
    let (parent, name) = guard.resolve_parent(request)?;
    let target = parent.as_path().join(&name);

    let existed = match fs::symlink_metadata(&target) {
        Ok(metadata) if metadata.is_dir() => return Err(ServeError::not_found(request)),
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(ServeError::io(request, e)),
    };

    write_atomic(parent.as_path(), &name, content).map_err(|e| ServeError::io(request, e))?;

    let path = join_relative(parent.relative(), &name);
    info!(path = %path, bytes = content.len(), existed, "Wrote file");

    let outcome = if existed {
        MutationOutcome::Replaced
    } else {
        MutationOutcome::Created
    };
    Ok(MutationReport::new(path, outcome))
}

/// Store uploaded files inside the folder at a request path.
///
/// Every name is validated before anything is written. Each file is
/// written atomically on its own.
pub fn upload_files(
    guard: &PathGuard,
    request: &str,
    files: &[UploadedFile],
) -> Result<MutationReport, ServeError> {
    let folder = validate_upload(guard, request, files)?;

    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        write_atomic(folder.as_path(), &file.name, &file.content)
            .map_err(|e| ServeError::io(request, e))?;
        info!(folder = folder.relative(), name = %file.name, bytes = file.content.len(), "Stored upload");
        stored.push(file.name.clone());
    }

    Ok(MutationReport::new(
        folder.relative(),
        MutationOutcome::Uploaded { files: stored },
    ))
}

/// Check an upload without writing it and return the target folder.
///
/// The folder must resolve to a directory inside the root, the upload must
/// carry at least one file, and no file name may be invalid or collide with
/// an existing directory.
pub fn validate_upload(
    guard: &PathGuard,
    request: &str,
    files: &[UploadedFile],
) -> Result<ResolvedPath, ServeError> {
    let folder = guard.resolve(request)?;
    if !folder.as_path().is_dir() {
        return Err(ServeError::not_found(request));
    }
    if files.is_empty() {
        return Err(ServeError::bad_request(request));
    }

    for file in files {
        validate_name(&file.name).map_err(|_| ServeError::bad_request(request))?;
        if folder.as_path().join(&file.name).is_dir() {
            return Err(ServeError::conflict(request));
        }
    }

    Ok(folder)
}

/// Write `content` to `dir/name` through a temporary file in `dir`.
///
/// On failure the temporary file is removed and `dir/name` is untouched.
pub(crate) fn write_atomic(dir: &Path, name: &str, content: &[u8]) -> io::Result<()> {
    let mut temp = Builder::new().prefix(TEMP_PREFIX).tempfile_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(dir.join(name)).map_err(|e| e.error)?;
    Ok(())
}
