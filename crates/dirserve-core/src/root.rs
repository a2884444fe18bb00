//! The served root directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::error::ConfigError;

/// Canonical directory that every served path is confined to.
///
/// A `Root` always names an existing directory: it can only be obtained
/// through [`Root::resolve`]. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Root {
    path: Arc<Path>,
}

impl Root {
    /// Resolve the configured root directory.
    ///
    /// Missing directories (and their ancestors) are created. The result is
    /// canonical, with symlinks in the configured path resolved.
    pub fn resolve(configured: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let configured = configured.as_ref();

        match fs::metadata(configured) {
            Ok(metadata) if !metadata.is_dir() => {
                error!(path = %configured.display(), "Supplied root is not a directory");
                return Err(ConfigError::NotADirectory {
                    path: configured.to_path_buf(),
                });
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %configured.display(), "Creating root directory");
                fs::create_dir_all(configured).map_err(|e| ConfigError::io(configured, e))?;
            }
            Err(e) => return Err(ConfigError::io(configured, e)),
        }

        let path = configured
            .canonicalize()
            .map_err(|e| ConfigError::io(configured, e))?;

        // The directory may have been swapped between the check and canonicalize.
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory { path });
        }

        Ok(Self { path: path.into() })
    }

    /// The canonical root path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Check that a canonical path is the root or lies beneath it.
    ///
    /// Comparison is by path components, so `/srv/data-evil` is not
    /// inside `/srv/data`.
    pub fn contains(&self, canonical: &Path) -> bool {
        canonical.starts_with(&self.path)
    }

    /// Path of a contained location relative to the root.
    pub fn relative<'a>(&self, canonical: &'a Path) -> Option<&'a Path> {
        canonical.strip_prefix(&self.path).ok()
    }

    /// Owned copy of the root path.
    pub fn to_path_buf(&self) -> PathBuf {
        self.path.to_path_buf()
    }
}

impl AsRef<Path> for Root {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_existing_directory() {
        let temp = TempDir::new().unwrap();
        let root = Root::resolve(temp.path()).unwrap();
        assert_eq!(root.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_creates_missing_ancestors() {
        let temp = TempDir::new().unwrap();
        let configured = temp.path().join("a").join("b").join("c");

        let root = Root::resolve(&configured).unwrap();

        assert!(configured.is_dir());
        assert!(root.as_path().is_absolute());
        assert!(root.as_path().ends_with("a/b/c"));
    }

    #[test]
    fn test_resolve_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, b"not a dir").unwrap();

        let err = Root::resolve(&file).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory { .. }));
    }

    #[test]
    fn test_contains_is_component_wise() {
        let temp = TempDir::new().unwrap();
        let root = Root::resolve(temp.path().join("root")).unwrap();

        let sibling = root.as_path().with_file_name("root-evil");
        assert!(!root.contains(&sibling));
        assert!(root.contains(root.as_path()));
        assert!(root.contains(&root.as_path().join("child")));
    }

    #[test]
    fn test_relative() {
        let temp = TempDir::new().unwrap();
        let root = Root::resolve(temp.path()).unwrap();
        let nested = root.as_path().join("x").join("y");

        assert_eq!(root.relative(&nested), Some(Path::new("x/y")));
        assert_eq!(root.relative(root.as_path()), Some(Path::new("")));
    }
}
