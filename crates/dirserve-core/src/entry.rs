//! Directory entry and listing types.

use std::fs::Metadata;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Anything that is not a directory.
    File,
    /// Directory.
    Directory,
}

impl EntryKind {
    /// Classify from filesystem metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name (not full path).
    pub name: CompactString,

    /// File or directory.
    pub kind: EntryKind,

    /// Size in bytes as reported by the filesystem.
    pub size: u64,

    /// Last modification time, if the platform reports one.
    pub modified: Option<DateTime<Utc>>,

    /// Whether the entry was reached through a symbolic link.
    #[serde(default)]
    pub symlink: bool,
}

impl DirectoryEntry {
    /// Build an entry from the metadata of its (resolved) target.
    pub fn from_metadata(name: impl Into<CompactString>, metadata: &Metadata, symlink: bool) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::from_metadata(metadata),
            size: metadata.len(),
            modified: modified_time(metadata),
            symlink,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }
}

/// Immediate children of one directory, partitioned by kind.
///
/// Both collections keep the order in which the directory was enumerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Subdirectories.
    pub directories: Vec<DirectoryEntry>,
    /// Everything else.
    pub files: Vec<DirectoryEntry>,
}

impl DirectoryListing {
    /// Create an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the collection matching its kind.
    pub fn push(&mut self, entry: DirectoryEntry) {
        match entry.kind {
            EntryKind::Directory => self.directories.push(entry),
            EntryKind::File => self.files.push(entry),
        }
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    /// Check if the listing has no entries.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// Return a copy with both collections sorted by name.
    pub fn sorted(mut self) -> Self {
        self.directories.sort_by(|a, b| a.name.cmp(&b.name));
        self.files.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }
}

/// Reference to a single file under the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    /// File name.
    pub name: CompactString,
    /// Path relative to the root, `/`-separated.
    pub path: String,
    /// Canonical on-disk location.
    pub location: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, if the platform reports one.
    pub modified: Option<DateTime<Utc>>,
}

impl FileReference {
    /// Build a reference from a file's location and metadata.
    pub fn from_metadata(
        name: impl Into<CompactString>,
        path: impl Into<String>,
        location: impl Into<PathBuf>,
        metadata: &Metadata,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            location: location.into(),
            size: metadata.len(),
            modified: modified_time(metadata),
        }
    }
}

fn modified_time(metadata: &Metadata) -> Option<DateTime<Utc>> {
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind) -> DirectoryEntry {
        DirectoryEntry {
            name: name.into(),
            kind,
            size: 0,
            modified: None,
            symlink: false,
        }
    }

    #[test]
    fn test_listing_push_partitions() {
        let mut listing = DirectoryListing::new();
        assert!(listing.is_empty());

        listing.push(entry("a.txt", EntryKind::File));
        listing.push(entry("b", EntryKind::Directory));

        assert_eq!(listing.len(), 2);
        assert_eq!(listing.files[0].name, "a.txt");
        assert_eq!(listing.directories[0].name, "b");
    }

    #[test]
    fn test_listing_keeps_enumeration_order() {
        let mut listing = DirectoryListing::new();
        listing.push(entry("zeta", EntryKind::File));
        listing.push(entry("alpha", EntryKind::File));
        assert_eq!(listing.files[0].name, "zeta");

        let sorted = listing.sorted();
        assert_eq!(sorted.files[0].name, "alpha");
        assert_eq!(sorted.files[1].name, "zeta");
    }

    #[test]
    fn test_entry_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EntryKind::Directory).unwrap();
        assert_eq!(json, "\"directory\"");
    }
}
