//! End-to-end manifest runs.
//!
//! [`run_manifest`] ties the pieces together: load the manifest,
//! validate it, and splice the source into a freshly written
//! destination. Policies decide what happens when the destination
//! already exists or when validation finds problems.

use crate::manifest::{load_manifest, ManifestOptions};
use crate::splice::PdfSplicer;
use pagesort_core::{
    reassemble, validate, OnExisting, OnInvalid, PageCopier, PagesortError, Result, SpliceSummary,
    ValidationOptions, ValidationReport,
};
use std::path::Path;

/// Options controlling a manifest run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// What to do when the manifest fails validation.
    pub on_invalid: OnInvalid,
    /// What to do when the destination file already exists.
    pub on_existing: OnExisting,
    /// Require the earliest range to start at page 1.
    pub require_first_page: bool,
    /// Require the ranges to reach the last page of the source.
    pub require_full_coverage: bool,
    /// How the manifest file is parsed.
    pub manifest: ManifestOptions,
}

/// What a manifest run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// The destination was written.
    Completed {
        /// Validation findings. Non-empty only when the run continued
        /// past them under [`OnInvalid::Proceed`].
        report: ValidationReport,
        /// Ranges and pages copied.
        summary: SpliceSummary,
    },
    /// The destination already existed and [`OnExisting::Abort`] was in
    /// effect. Nothing was written.
    SkippedExisting,
}

/// Load a manifest, validate it, and splice the source into the
/// destination.
///
/// The destination check runs before anything is read, so an existing
/// file surfaces immediately rather than after manifest parsing. The
/// destination itself is only written once every range has been copied.
///
/// # Errors
///
/// Returns [`PagesortError::DestinationExists`] when the destination is
/// present under [`OnExisting::Fail`], [`PagesortError::InvalidManifest`]
/// when validation fails under [`OnInvalid::Abort`], and otherwise any
/// manifest, source, or destination error from the underlying steps.
pub fn run_manifest<P, Q, R>(
    manifest: P,
    source: Q,
    dest: R,
    options: &RunOptions,
) -> Result<RunOutcome>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let dest = dest.as_ref();
    if dest.exists() {
        match options.on_existing {
            OnExisting::Fail => {
                return Err(PagesortError::DestinationExists {
                    path: dest.to_path_buf(),
                })
            }
            OnExisting::Abort => {
                log::info!("destination {} already exists, skipping", dest.display());
                return Ok(RunOutcome::SkippedExisting);
            }
            OnExisting::Overwrite => {
                log::info!("destination {} already exists, overwriting", dest.display());
            }
        }
    }

    let records = load_manifest(manifest, &options.manifest)?;
    let mut splicer = PdfSplicer::open(source, dest)?;

    let mut validation =
        ValidationOptions::new().with_first_page_check(options.require_first_page);
    if options.require_full_coverage {
        validation = validation.with_expected_last_page(splicer.page_count());
    }

    let report = validate(&records, &validation);
    if !report.is_valid() {
        for violation in report.violations() {
            log::warn!("{violation}");
        }
        match options.on_invalid {
            OnInvalid::Abort => return Err(PagesortError::InvalidManifest(report)),
            OnInvalid::Proceed => {
                log::warn!(
                    "proceeding past {} validation finding(s)",
                    report.violations().len()
                );
            }
        }
    }

    let summary = reassemble(&records, &mut splicer)?;
    Ok(RunOutcome::Completed { report, summary })
}
