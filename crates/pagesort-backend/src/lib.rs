//! Manifest loading and PDF splicing for `pagesort`
//!
//! This crate supplies the concrete backends behind the reassembly
//! engine in [`pagesort_core`]: a CSV loader that turns manifest files
//! into [`RangeRecord`]s, and a [`PdfSplicer`] that implements the
//! engine's [`PageCopier`] trait on top of `lopdf`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      run_manifest                        │
//! │   (destination policy, validation policy, orchestration) │
//! └──────────────────────────────────────────────────────────┘
//!          │                    │                    │
//!          ▼                    ▼                    ▼
//! ┌───────────────┐    ┌────────────────┐    ┌───────────────┐
//! │ load_manifest │    │ pagesort_core  │    │  PdfSplicer   │
//! │ (csv + chrono)│    │ validate +     │    │ (lopdf copy + │
//! │               │    │ reassemble     │    │  finalize)    │
//! └───────────────┘    └────────────────┘    └───────────────┘
//! ```
//!
//! # Usage
//!
//! The one-call form runs a whole manifest:
//!
//! ```ignore
//! use pagesort_backend::{run_manifest, RunOptions, RunOutcome};
//!
//! let outcome = run_manifest("manifest.csv", "scanned.pdf", "sorted.pdf", &RunOptions::default())?;
//! if let RunOutcome::Completed { summary, .. } = outcome {
//!     println!("copied {} page(s)", summary.pages);
//! }
//! # Ok::<(), pagesort_core::PagesortError>(())
//! ```
//!
//! The pieces also work separately, for callers that want to inspect
//! the validation report before deciding to splice:
//!
//! ```ignore
//! use pagesort_backend::{load_manifest, ManifestOptions, PdfSplicer};
//! use pagesort_core::{reassemble, validate, ValidationOptions};
//!
//! let records = load_manifest("manifest.csv", &ManifestOptions::default())?;
//! let report = validate(&records, &ValidationOptions::default());
//! if report.is_valid() {
//!     let mut splicer = PdfSplicer::open("scanned.pdf", "sorted.pdf")?;
//!     reassemble(&records, &mut splicer)?;
//! }
//! # Ok::<(), pagesort_core::PagesortError>(())
//! ```
//!
//! [`RangeRecord`]: pagesort_core::RangeRecord
//! [`PageCopier`]: pagesort_core::PageCopier

pub mod manifest;
pub mod runner;
pub mod splice;

pub use manifest::{load_manifest, parse_manifest, ManifestOptions};
pub use runner::{run_manifest, RunOptions, RunOutcome};
pub use splice::{inspect_source, PdfSplicer, SourceInfo};
