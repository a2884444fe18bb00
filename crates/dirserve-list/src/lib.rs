//! Directory listing for dirserve.
//!
//! [`DirectoryLister`] turns a [`ResolvedPath`] into a [`DirectoryListing`]
//! of its immediate children, re-applying the root containment check to
//! every child. Files are described with a [`FileReference`] or read whole.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirserve_core::{PathGuard, Root};
//! use dirserve_list::{DirectoryLister, Lookup};
//!
//! let guard = PathGuard::new(Root::resolve("target").unwrap());
//! let lister = DirectoryLister::new(guard);
//!
//! match lister.lookup("").unwrap() {
//!     Lookup::Directory(listing) => println!("{} entries", listing.len()),
//!     Lookup::File(file) => println!("{}", file.location.display()),
//! }
//! ```

mod lister;

pub use lister::{DirectoryLister, Lookup};

// Re-export core types for convenience
pub use dirserve_core::{
    DirectoryEntry, DirectoryListing, EntryKind, FileReference, PathGuard, ResolvedPath,
    ServeError,
};
