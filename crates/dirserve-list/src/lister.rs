//! One-level directory listing confined to the root.

use std::fs;

use serde::Serialize;
use tracing::{debug, warn};

use dirserve_core::{
    DirectoryEntry, DirectoryListing, FileReference, PathGuard, ResolvedPath, ServeError,
};

/// Result of looking up a request path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lookup {
    /// The path named a directory.
    Directory(DirectoryListing),
    /// The path named a file.
    File(FileReference),
}

/// Lists directories and describes files beneath a root.
///
/// Every child is canonicalized and checked against the root before it is
/// reported, so a symlink inside the tree cannot expose anything outside it.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    guard: PathGuard,
    include_hidden: bool,
}

impl DirectoryLister {
    /// Create a lister using the given guard.
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            include_hidden: true,
        }
    }

    /// Set whether dot-files are included in listings.
    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// The guard used for containment checks.
    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Resolve a request path and either list it or describe it.
    pub fn lookup(&self, request: &str) -> Result<Lookup, ServeError> {
        let resolved = self.guard.resolve(request)?;
        let metadata =
            fs::metadata(resolved.as_path()).map_err(|e| ServeError::io(request, e))?;

        if metadata.is_dir() {
            self.list(&resolved).map(Lookup::Directory)
        } else {
            self.describe(&resolved).map(Lookup::File)
        }
    }

    /// List the immediate children of a directory.
    ///
    /// Entries come back in enumeration order. Children that resolve outside
    /// the root, or that cannot be resolved at all (missing targets, symlink
    /// loops), are left out.
    pub fn list(&self, path: &ResolvedPath) -> Result<DirectoryListing, ServeError> {
        let request = path.relative();
        let metadata = fs::metadata(path.as_path()).map_err(|e| ServeError::io(request, e))?;
        if !metadata.is_dir() {
            return Err(ServeError::not_found(request));
        }

        // The handle is dropped on every return below.
        let entries = fs::read_dir(path.as_path()).map_err(|e| internal(request, e))?;
        let mut listing = DirectoryListing::new();

        for entry in entries {
            let entry = entry.map_err(|e| internal(request, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if !self.include_hidden && name.starts_with('.') {
                continue;
            }

            let child = entry.path();
            let canonical = match child.canonicalize() {
                Ok(p) => p,
                Err(e) => {
                    debug!(dir = request, name = %name, error = %e, "Skipping unresolvable entry");
                    continue;
                }
            };

            if !self.guard.contains(&canonical) {
                warn!(dir = request, name = %name, "Skipping entry resolving outside root");
                continue;
            }

            let metadata = fs::metadata(&canonical).map_err(|e| internal(request, e))?;
            let symlink = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);

            listing.push(DirectoryEntry::from_metadata(name, &metadata, symlink));
        }

        Ok(listing)
    }

    /// Describe a file without reading it.
    pub fn describe(&self, path: &ResolvedPath) -> Result<FileReference, ServeError> {
        let request = path.relative();
        let metadata = fs::metadata(path.as_path()).map_err(|e| ServeError::io(request, e))?;
        if metadata.is_dir() {
            return Err(ServeError::not_found(request));
        }

        Ok(FileReference::from_metadata(
            path.name(),
            request,
            path.as_path(),
            &metadata,
        ))
    }

    /// Read a file's full content.
    pub fn read(&self, path: &ResolvedPath) -> Result<Vec<u8>, ServeError> {
        let request = path.relative();
        if path.as_path().is_dir() {
            return Err(ServeError::not_found(request));
        }
        fs::read(path.as_path()).map_err(|e| ServeError::io(request, e))
    }
}

fn internal(request: &str, source: std::io::Error) -> ServeError {
    ServeError::Internal {
        request: request.to_string(),
        source,
    }
}
