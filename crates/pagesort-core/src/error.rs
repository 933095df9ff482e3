//! Error types for pagesort operations.

use crate::report::ValidationReport;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating, or reassembling.
#[derive(Error, Debug)]
pub enum PagesortError {
    /// The manifest failed validation and policy said to stop.
    ///
    /// Carries the full report so callers can still print every finding.
    #[error("manifest failed validation with {} violation(s)", .0.violations().len())]
    InvalidManifest(ValidationReport),

    /// The manifest file could not be read.
    #[error("cannot read manifest {}: {message}", .path.display())]
    ManifestRead {
        /// Path to the manifest file
        path: PathBuf,
        /// Underlying reader error
        message: String,
    },

    /// A manifest row could not be parsed into a range record.
    #[error("manifest row {row}: {message}")]
    ManifestParse {
        /// 1-based manifest line the error refers to
        row: u64,
        /// What could not be parsed
        message: String,
    },

    /// The source document could not be opened or read.
    #[error("cannot read source {}: {message}", .path.display())]
    SourceRead {
        /// Path to the source document
        path: PathBuf,
        /// Underlying parser error
        message: String,
    },

    /// A manifest range points past the end of the source document.
    #[error("page {page} is out of bounds for a source with {total} page(s)")]
    PageOutOfBounds {
        /// The offending page number
        page: u32,
        /// Pages actually present in the source
        total: u32,
    },

    /// The destination already exists and policy said not to touch it.
    #[error("destination {} already exists", .path.display())]
    DestinationExists {
        /// Path that would have been overwritten
        path: PathBuf,
    },

    /// The reassembled document could not be written out.
    #[error("cannot write destination {}: {message}", .path.display())]
    DestinationWrite {
        /// Path being written
        path: PathBuf,
        /// Underlying writer error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pagesort operations
pub type Result<T> = std::result::Result<T, PagesortError>;
