//! Resolution of untrusted request paths against the root.

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ServeError;
use crate::root::Root;

/// Maximum length of a single file or directory name.
pub const MAX_NAME_LEN: usize = 255;

/// A canonical location that is the root or lies beneath it.
///
/// Only [`PathGuard`] can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    path: PathBuf,
    relative: String,
}

impl ResolvedPath {
    fn new(root: &Root, path: PathBuf) -> Self {
        let relative = root
            .relative(&path)
            .map(render_relative)
            .unwrap_or_default();
        Self { path, relative }
    }

    /// Canonical on-disk path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the root, `/`-separated; empty for the root itself.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Whether this is the root itself.
    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }

    /// Final path component, or `/` for the root.
    pub fn name(&self) -> &str {
        self.relative.rsplit('/').next().filter(|n| !n.is_empty()).unwrap_or("/")
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Confines request paths to a [`Root`].
///
/// The guard never touches the filesystem beyond the syscalls needed to
/// canonicalize a path.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: Root,
}

impl PathGuard {
    /// Create a guard for the given root.
    pub fn new(root: Root) -> Self {
        Self { root }
    }

    /// The root this guard confines paths to.
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Resolve a request path to an existing, contained location.
    ///
    /// The empty string names the root. Leading separators are ignored so a
    /// request can never replace the root when joined. Missing targets,
    /// dangling symlinks and anything resolving outside the root are all
    /// rejected with `BadRequest`.
    pub fn resolve(&self, request: &str) -> Result<ResolvedPath, ServeError> {
        let joined = self.root.as_path().join(strip_leading_separators(request));

        let canonical = match joined.canonicalize() {
            Ok(path) => path,
            Err(e) => {
                debug!(request, error = %e, "Path does not resolve");
                return Err(ServeError::bad_request(request));
            }
        };

        if !self.root.contains(&canonical) {
            warn!(request, "Rejected path resolving outside root");
            return Err(ServeError::bad_request(request));
        }

        Ok(ResolvedPath::new(&self.root, canonical))
    }

    /// Resolve the parent of a possibly non-existent entry.
    ///
    /// The parent must resolve inside the root and the final component must
    /// be a valid name. Returns the parent and the validated name.
    pub fn resolve_parent(&self, request: &str) -> Result<(ResolvedPath, String), ServeError> {
        let trimmed = strip_leading_separators(request).trim_end_matches('/');
        let relative = Path::new(trimmed);

        let name = match relative.components().next_back() {
            Some(Component::Normal(name)) => name
                .to_str()
                .ok_or_else(|| ServeError::bad_request(request))?,
            _ => return Err(ServeError::bad_request(request)),
        };
        validate_name(name).map_err(|reason| {
            debug!(request, reason, "Invalid entry name");
            ServeError::bad_request(request)
        })?;

        let parent = relative
            .parent()
            .and_then(Path::to_str)
            .unwrap_or_default();
        let parent = self.resolve(parent).map_err(|_| ServeError::bad_request(request))?;

        Ok((parent, name.to_string()))
    }

    /// Check that a canonical path lies within the root.
    pub fn contains(&self, canonical: &Path) -> bool {
        self.root.contains(canonical)
    }
}

/// Validate a single file or directory name.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("Name cannot be empty");
    }

    if name.len() > MAX_NAME_LEN {
        return Err("Name is too long");
    }

    if name.contains(['/', '\\', '\0']) {
        return Err("Name cannot contain separators or NUL");
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names");
    }

    Ok(())
}

fn strip_leading_separators(request: &str) -> &str {
    request.trim_start_matches(['/', MAIN_SEPARATOR])
}

fn render_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathGuard) {
        let temp = TempDir::new().unwrap();
        let root = Root::resolve(temp.path().join("root")).unwrap();
        fs::create_dir(root.as_path().join("docs")).unwrap();
        fs::write(root.as_path().join("docs").join("a.txt"), b"hello").unwrap();
        (temp, PathGuard::new(root))
    }

    #[test]
    fn test_resolve_empty_is_root() {
        let (_temp, guard) = setup();
        let resolved = guard.resolve("").unwrap();
        assert_eq!(resolved.as_path(), guard.root().as_path());
        assert!(resolved.is_root());
        assert_eq!(resolved.name(), "/");
    }

    #[test]
    fn test_resolve_nested() {
        let (_temp, guard) = setup();
        let resolved = guard.resolve("docs/a.txt").unwrap();
        assert_eq!(resolved.relative(), "docs/a.txt");
        assert_eq!(resolved.name(), "a.txt");
    }

    #[test]
    fn test_resolve_leading_slash_stays_in_root() {
        let (_temp, guard) = setup();
        let resolved = guard.resolve("/docs").unwrap();
        assert_eq!(resolved.relative(), "docs");
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_backslash_is_part_of_the_name() {
        let (_temp, guard) = setup();
        assert!(matches!(
            guard.resolve("\\docs"),
            Err(ServeError::BadRequest { .. })
        ));

        fs::write(guard.root().as_path().join("\\notes"), b"n").unwrap();
        let resolved = guard.resolve("\\notes").unwrap();
        assert_eq!(resolved.relative(), "\\notes");
    }

    #[test]
    fn test_resolve_dot_segments_inside_root() {
        let (_temp, guard) = setup();
        let resolved = guard.resolve("docs/./../docs/a.txt").unwrap();
        assert_eq!(resolved.relative(), "docs/a.txt");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_temp, guard) = setup();
        assert!(matches!(guard.resolve(".."), Err(ServeError::BadRequest { .. })));
        assert!(matches!(
            guard.resolve("docs/../../"),
            Err(ServeError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_missing() {
        let (_temp, guard) = setup();
        assert!(matches!(
            guard.resolve("nope.txt"),
            Err(ServeError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_resolve_parent() {
        let (_temp, guard) = setup();
        let (parent, name) = guard.resolve_parent("docs/new.txt").unwrap();
        assert_eq!(parent.relative(), "docs");
        assert_eq!(name, "new.txt");

        let (parent, name) = guard.resolve_parent("fresh/").unwrap();
        assert!(parent.is_root());
        assert_eq!(name, "fresh");
    }

    #[test]
    fn test_resolve_parent_rejects_bad_names() {
        let (_temp, guard) = setup();
        assert!(guard.resolve_parent("").is_err());
        assert!(guard.resolve_parent("docs/..").is_err());
        assert!(guard.resolve_parent("../outside.txt").is_err());
        assert!(guard.resolve_parent("missing/child.txt").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("report.pdf").is_ok());
        assert!(validate_name(".hidden").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
