//! Core types for dirserve.
//!
//! This crate owns the security boundary of the server: the canonical
//! [`Root`] fixed at startup and the [`PathGuard`] that turns untrusted
//! request paths into [`ResolvedPath`]s confined to it. It also defines the
//! listing types and configuration shared by the other crates.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirserve_core::{PathGuard, Root};
//!
//! let root = Root::resolve("target").unwrap();
//! let guard = PathGuard::new(root);
//!
//! let docs = guard.resolve("docs").unwrap();
//! assert!(guard.resolve("../../etc/passwd").is_err());
//! println!("{}", docs.as_path().display());
//! ```

mod config;
mod entry;
mod error;
mod guard;
mod root;

pub use config::{DEFAULT_BIND, DEFAULT_ROOT, ServeConfig, ServeConfigBuilder};
pub use entry::{DirectoryEntry, DirectoryListing, EntryKind, FileReference};
pub use error::{ConfigError, ServeError};
pub use guard::{MAX_NAME_LEN, PathGuard, ResolvedPath, validate_name};
pub use root::Root;
