//! Shared, read-only handler state.

use dirserve_core::{ConfigError, PathGuard, Root, ServeConfig};
use dirserve_list::DirectoryLister;
use dirserve_ops::MutationExecutor;

/// Everything a handler needs. Cloned into each request.
#[derive(Debug, Clone)]
pub struct AppState {
    lister: DirectoryLister,
    executor: MutationExecutor,
}

impl AppState {
    /// Build state for an already resolved root.
    pub fn new(root: Root, config: &ServeConfig) -> Self {
        let guard = PathGuard::new(root);
        Self {
            lister: DirectoryLister::new(guard.clone()).with_include_hidden(config.include_hidden),
            executor: MutationExecutor::new(guard).with_writes(config.writes_enabled),
        }
    }

    /// Resolve the configured root and build state for it.
    pub fn from_config(config: &ServeConfig) -> Result<Self, ConfigError> {
        let root = Root::resolve(&config.root)?;
        Ok(Self::new(root, config))
    }

    /// The directory lister.
    pub fn lister(&self) -> &DirectoryLister {
        &self.lister
    }

    /// The mutation executor.
    pub fn executor(&self) -> &MutationExecutor {
        &self.executor
    }

    /// The served root.
    pub fn root(&self) -> &Root {
        self.lister.guard().root()
    }
}
