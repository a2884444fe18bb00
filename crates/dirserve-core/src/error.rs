//! Error types for root setup and per-request path handling.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while setting up the served root.
///
/// None of these can happen once a [`Root`](crate::Root) exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured root exists but is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Resolving or creating the root failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ConfigError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while serving a single request.
///
/// Messages only ever carry the path the caller supplied, never the
/// location it resolved to.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The path does not resolve, or resolves outside the root.
    #[error("Invalid path: {request}")]
    BadRequest { request: String },

    /// The path resolved, but to the wrong kind of entry.
    #[error("Not found: {request}")]
    NotFound { request: String },

    /// The entry to be created already exists.
    #[error("Already exists: {request}")]
    Conflict { request: String },

    /// The filesystem failed for reasons unrelated to the request.
    #[error("I/O error at {request}: {source}")]
    Internal {
        request: String,
        #[source]
        source: std::io::Error,
    },
}

impl ServeError {
    /// Reject a request path.
    pub fn bad_request(request: impl Into<String>) -> Self {
        Self::BadRequest {
            request: request.into(),
        }
    }

    /// Report a resolved entry of the wrong kind.
    pub fn not_found(request: impl Into<String>) -> Self {
        Self::NotFound {
            request: request.into(),
        }
    }

    /// Report an entry that already exists.
    pub fn conflict(request: impl Into<String>) -> Self {
        Self::Conflict {
            request: request.into(),
        }
    }

    /// Create an I/O error with request context.
    ///
    /// A vanished entry maps to `NotFound`; everything else is internal.
    pub fn io(request: impl Into<String>, source: std::io::Error) -> Self {
        let request = request.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { request },
            _ => Self::Internal { request, source },
        }
    }

    /// Whether the caller is to blame for this error.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal { .. })
    }
}
