//! Mutation operations for dirserve.
//!
//! This crate implements folder creation, uploads and create-or-replace
//! writes. Every operation validates its path through the
//! [`PathGuard`](dirserve_core::PathGuard) first. File content is always
//! written through a temporary file and renamed into place, so a failed
//! write never leaves a partially written target behind.
//!
//! Writes are disabled by default: a [`MutationExecutor`] without
//! [`with_writes`](MutationExecutor::with_writes) validates and acknowledges
//! requests without touching the disk.

mod create;
mod executor;
mod operation;
mod write;

pub use create::create_folder;
pub use executor::MutationExecutor;
pub use operation::{Mutation, MutationOutcome, MutationReport, UploadedFile};
pub use write::{replace_file, upload_files, validate_upload};
