//! Mutation request and outcome types.

use serde::{Deserialize, Serialize};

/// A file handed over by an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name the file is stored under, inside the target folder.
    pub name: String,
    /// Full file content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Create an uploaded file.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A mutation requested against a path beneath the root.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Create a folder at the path.
    CreateFolder { path: String },
    /// Store files inside the folder at the path.
    Upload {
        path: String,
        files: Vec<UploadedFile>,
    },
    /// Create or replace the file at the path.
    Replace { path: String, content: Vec<u8> },
}

impl Mutation {
    /// Create a folder creation mutation.
    pub fn create_folder(path: impl Into<String>) -> Self {
        Self::CreateFolder { path: path.into() }
    }

    /// Create an upload mutation.
    pub fn upload(path: impl Into<String>, files: Vec<UploadedFile>) -> Self {
        Self::Upload {
            path: path.into(),
            files,
        }
    }

    /// Create a replace mutation.
    pub fn replace(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::Replace {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The request path this mutation targets.
    pub fn path(&self) -> &str {
        match self {
            Self::CreateFolder { path } | Self::Upload { path, .. } | Self::Replace { path, .. } => {
                path
            }
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateFolder { .. } => "create",
            Self::Upload { .. } => "upload",
            Self::Replace { .. } => "replace",
        }
    }
}

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MutationOutcome {
    /// The path was validated but nothing was written (writes disabled).
    Accepted,
    /// A new folder or file was created.
    Created,
    /// An existing file's content was replaced.
    Replaced,
    /// Files were stored in a folder.
    Uploaded { files: Vec<String> },
}

/// Outcome of a mutation along with the root-relative path it targeted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Root-relative, `/`-separated path.
    pub path: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: MutationOutcome,
}

impl MutationReport {
    /// Create a report.
    pub fn new(path: impl Into<String>, outcome: MutationOutcome) -> Self {
        Self {
            path: path.into(),
            outcome,
        }
    }
}
