//! # Pagesort Core - Manifest-Driven Page Reassembly
//!
//! Pagesort rebuilds a scanned document whose pages are out of order. A
//! CSV manifest declares which page ranges belong together and the date
//! each range should sort under; this crate holds the manifest model,
//! the validator, and the ordering engine that drives a page copier.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! // Note: PdfSplicer and the manifest loader are in pagesort-backend
//! use pagesort_backend::{load_manifest, PdfSplicer};
//! use pagesort_core::{reassemble, validate, Result, ValidationOptions};
//!
//! fn main() -> Result<()> {
//!     let records = load_manifest("manifest.csv")?;
//!
//!     let report = validate(&records, &ValidationOptions::default());
//!     for violation in report.violations() {
//!         eprintln!("{violation}");
//!     }
//!
//!     if report.is_valid() {
//!         let mut splicer = PdfSplicer::open("scanned.pdf", "sorted.pdf")?;
//!         let summary = reassemble(&records, &mut splicer)?;
//!         println!("wrote {} page(s)", summary.pages);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`record`] - The manifest row model
//! - [`validate`] - Range consistency checks over a whole manifest
//! - [`report`] - Structured validation findings
//! - [`engine`] - Sort-key ordering and the [`PageCopier`] seam
//! - [`policy`] - Caller decisions for invalid manifests and existing files
//! - [`error`] - Error types and handling
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T, PagesortError>`](error::PagesortError).
//! Validation itself is infallible: it returns a [`ValidationReport`]
//! listing every finding, and callers decide through [`policy`] whether
//! an invalid manifest stops the run.

pub mod engine;
pub mod error;
pub mod policy;
pub mod record;
pub mod report;
pub mod validate;

// Re-exports for convenience
pub use engine::*;
pub use error::*;
pub use policy::*;
pub use record::*;
pub use report::*;
pub use validate::*;
