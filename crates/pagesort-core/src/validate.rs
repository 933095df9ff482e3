//! Manifest validation.
//!
//! Validation is a pure pass over the records: it reads, never mutates,
//! and collects every finding instead of stopping at the first one.

use crate::policy::ValidationOptions;
use crate::record::RangeRecord;
use crate::report::{ValidationReport, Violation, ViolationKind};

/// Check a manifest's page ranges for internal consistency.
///
/// Records are checked in the order given, which is the manifest's file
/// order. Two checks run for each record from the second onward:
///
/// 1. The record's own span must not run backwards.
/// 2. The record must start exactly one page after its predecessor ends.
///
/// Both checks can fail on the same record, and later records are always
/// checked regardless of earlier findings, so the report names every bad
/// row in one pass. The first record has no predecessor and its span is
/// only inspected when [`ValidationOptions`] asks for it.
///
/// The checks compare declared page numbers only. Sort keys play no part
/// here, and an empty manifest is valid.
#[must_use]
pub fn validate(records: &[RangeRecord], options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::default();

    if options.require_first_page {
        if let Some(first) = records.first() {
            if first.page_from != 1 {
                report.push(Violation {
                    row: first.row,
                    kind: ViolationKind::FirstPageNotOne {
                        page_from: first.page_from,
                    },
                });
            }
        }
    }

    for window in records.windows(2) {
        let prev = &window[0];
        let cur = &window[1];

        if !cur.is_well_formed() {
            report.push(Violation {
                row: cur.row,
                kind: ViolationKind::InvertedRange {
                    page_from: cur.page_from,
                    page_to: cur.page_to,
                },
            });
        }

        if i64::from(cur.page_from) - i64::from(prev.page_to) != 1 {
            report.push(Violation {
                row: cur.row,
                kind: ViolationKind::NotAdjacent {
                    page_from: cur.page_from,
                    prev_page_to: prev.page_to,
                },
            });
        }
    }

    if let Some(expected) = options.expected_last_page {
        if let Some(last) = records.last() {
            if last.page_to != expected {
                report.push(Violation {
                    row: last.row,
                    kind: ViolationKind::ShortCoverage {
                        page_to: last.page_to,
                        expected,
                    },
                });
            }
        }
    }

    report
}
