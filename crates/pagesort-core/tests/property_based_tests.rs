//! Property-Based Tests
//!
//! Tests using property-based testing (proptest) to verify invariants:
//! - Well-formed adjacent manifests always validate clean
//! - Validation is deterministic and tied to declared page numbers only
//! - Ordering is a stable permutation of the input
//!
//! These tests complement unit tests by exploring the input space automatically.

use chrono::{Duration, NaiveDate};
use pagesort_core::{
    plan_order, reassemble, validate, PageCopier, RangeRecord, Result, ValidationOptions,
};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Arbitrary records with no structural guarantees at all.
fn arb_records() -> impl Strategy<Value = Vec<RangeRecord>> {
    prop::collection::vec((1u32..=200, 1u32..=200, 0i64..=3650), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (page_from, page_to, offset))| {
                let date = base_date() + Duration::days(offset);
                RangeRecord::new(date, page_from, page_to, i as u64 + 2)
            })
            .collect()
    })
}

/// Records whose ranges tile the pages from 1 upward with no gaps.
fn arb_adjacent_records(count: std::ops::Range<usize>) -> impl Strategy<Value = Vec<RangeRecord>> {
    prop::collection::vec((1u32..=20, 0i64..=3650), count).prop_map(|spans| {
        let mut next_from = 1u32;
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (len, offset))| {
                let page_from = next_from;
                let page_to = page_from + len - 1;
                next_from = page_to + 1;
                let date = base_date() + Duration::days(offset);
                RangeRecord::new(date, page_from, page_to, i as u64 + 2)
            })
            .collect()
    })
}

/// Counts copier calls without touching any real document.
#[derive(Default)]
struct TallyCopier {
    ranges: usize,
    pages: u64,
    finalized: usize,
}

impl PageCopier for TallyCopier {
    fn page_count(&self) -> u32 {
        u32::MAX
    }

    fn copy_range(&mut self, page_from: u32, page_to: u32) -> Result<()> {
        self.ranges += 1;
        if page_to >= page_from {
            self.pages += u64::from(page_to - page_from) + 1;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.finalized += 1;
        Ok(())
    }
}

// ============================================================================
// Validation Properties
// ============================================================================

/// Property: A manifest that tiles pages 1..n with adjacent ranges is valid
#[test]
fn proptest_adjacent_manifests_validate_clean() {
    proptest!(|(records in arb_adjacent_records(1..10))| {
        let report = validate(&records, &ValidationOptions::default());
        prop_assert!(report.is_valid(), "adjacent manifest should validate clean");
    });
}

/// Property: Validation never depends on sort keys
#[test]
fn proptest_sort_keys_never_affect_validity() {
    proptest!(|(records in arb_records(), shift in 0i64..=365)| {
        let original = validate(&records, &ValidationOptions::default());

        let shifted: Vec<RangeRecord> = records
            .iter()
            .map(|r| RangeRecord::new(r.sort_key + Duration::days(shift), r.page_from, r.page_to, r.row))
            .collect();
        let after = validate(&shifted, &ValidationOptions::default());

        prop_assert_eq!(original.is_valid(), after.is_valid());
        prop_assert_eq!(original.violations().len(), after.violations().len());
    });
}

/// Property: Validating the same input twice gives the same report
#[test]
fn proptest_validation_is_deterministic() {
    proptest!(|(records in arb_records())| {
        let options = ValidationOptions::default();
        prop_assert_eq!(validate(&records, &options), validate(&records, &options));
    });
}

/// Property: Every violation points at a row that exists in the manifest
#[test]
fn proptest_violation_rows_come_from_input() {
    proptest!(|(records in arb_records())| {
        let report = validate(&records, &ValidationOptions::default());
        for violation in report.violations() {
            prop_assert!(
                records.iter().any(|r| r.row == violation.row),
                "violation row {} not in manifest",
                violation.row
            );
        }
    });
}

/// Property: Moving any non-first range's start breaks validation
#[test]
fn proptest_breaking_adjacency_is_reported() {
    let records_and_index = arb_adjacent_records(2..10).prop_flat_map(|records| {
        let len = records.len();
        (Just(records), 1..len, 1u32..=5, prop::bool::ANY)
    });

    proptest!(|((mut records, index, delta, add) in records_and_index)| {
        let record = &mut records[index];
        let moved = if add {
            record.page_from + delta
        } else {
            record.page_from.saturating_sub(delta)
        };
        *record = RangeRecord::new(record.sort_key, moved, record.page_to, record.row);

        let report = validate(&records, &ValidationOptions::default());
        prop_assert!(!report.is_valid(), "moved range start should be reported");
        prop_assert!(report.violations().iter().any(|v| v.row == records[index].row));
    });
}

// ============================================================================
// Ordering Properties
// ============================================================================

/// Property: Ordering returns a permutation of the input records
#[test]
fn proptest_plan_order_is_permutation() {
    proptest!(|(records in arb_records())| {
        let ordered = plan_order(&records);
        prop_assert_eq!(ordered.len(), records.len());

        let mut input_rows: Vec<u64> = records.iter().map(|r| r.row).collect();
        let mut output_rows: Vec<u64> = ordered.iter().map(|r| r.row).collect();
        input_rows.sort_unstable();
        output_rows.sort_unstable();
        prop_assert_eq!(input_rows, output_rows);
    });
}

/// Property: Ordering is ascending by sort key and stable on ties
#[test]
fn proptest_plan_order_is_stable_sort() {
    proptest!(|(records in arb_records())| {
        let ordered = plan_order(&records);
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].sort_key <= pair[1].sort_key);
            if pair[0].sort_key == pair[1].sort_key {
                // Rows grow with manifest position, so stability shows
                // up as ascending rows within a key.
                prop_assert!(pair[0].row < pair[1].row);
            }
        }
    });
}

/// Property: Reassembly copies one range per record and finalizes once
#[test]
fn proptest_reassemble_accounts_for_every_range() {
    proptest!(|(records in arb_adjacent_records(0..10))| {
        let mut copier = TallyCopier::default();
        let summary = reassemble(&records, &mut copier).unwrap();

        let expected_pages: u64 = records.iter().map(RangeRecord::pages).sum();
        prop_assert_eq!(copier.ranges, records.len());
        prop_assert_eq!(copier.finalized, 1);
        prop_assert_eq!(summary.ranges, records.len());
        prop_assert_eq!(summary.pages, expected_pages);
        prop_assert_eq!(copier.pages, expected_pages);
    });
}
