//! Mutation executor with stub and write modes.

use std::io;

use tracing::info;

use dirserve_core::{PathGuard, ServeError};

use crate::create::{create_folder, join_relative};
use crate::operation::{Mutation, MutationOutcome, MutationReport};
use crate::write::{replace_file, upload_files, validate_upload};

/// Runs mutations against a root.
///
/// With writes disabled every mutation still goes through path validation
/// and is then acknowledged with [`MutationOutcome::Accepted`] without
/// touching the filesystem.
#[derive(Debug, Clone)]
pub struct MutationExecutor {
    guard: PathGuard,
    writes_enabled: bool,
}

impl MutationExecutor {
    /// Create an executor that validates but never writes.
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            writes_enabled: false,
        }
    }

    /// Set whether mutations are applied to the filesystem.
    pub fn with_writes(mut self, enabled: bool) -> Self {
        self.writes_enabled = enabled;
        self
    }

    /// Whether mutations are applied to the filesystem.
    pub fn writes_enabled(&self) -> bool {
        self.writes_enabled
    }

    /// Run a mutation on the blocking thread pool.
    pub async fn execute(&self, mutation: Mutation) -> Result<MutationReport, ServeError> {
        let request = mutation.path().to_string();
        let executor = self.clone();

        tokio::task::spawn_blocking(move || executor.execute_blocking(&mutation))
            .await
            .map_err(|e| ServeError::Internal {
                request,
                source: io::Error::other(e),
            })?
    }

    /// Run a mutation on the current thread.
    pub fn execute_blocking(&self, mutation: &Mutation) -> Result<MutationReport, ServeError> {
        info!(kind = mutation.kind(), path = mutation.path(), writes = self.writes_enabled, "Mutation requested");

        if !self.writes_enabled {
            return self.accept(mutation);
        }

        match mutation {
            Mutation::CreateFolder { path } => create_folder(&self.guard, path),
            Mutation::Upload { path, files } => upload_files(&self.guard, path, files),
            Mutation::Replace { path, content } => replace_file(&self.guard, path, content),
        }
    }

    /// Run a mutation's validation and acknowledge it without writing.
    fn accept(&self, mutation: &Mutation) -> Result<MutationReport, ServeError> {
        let path = match mutation {
            Mutation::Upload { path, files } => validate_upload(&self.guard, path, files)?
                .relative()
                .to_string(),
            Mutation::CreateFolder { path } | Mutation::Replace { path, .. } => {
                let (parent, name) = self.guard.resolve_parent(path)?;
                join_relative(parent.relative(), &name)
            }
        };
        Ok(MutationReport::new(path, MutationOutcome::Accepted))
    }
}
