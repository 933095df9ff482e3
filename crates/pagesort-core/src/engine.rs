//! The reassembly engine.
//!
//! The engine decides *which pages move where*; the actual page copying
//! lives behind the [`PageCopier`] trait so the ordering logic stays
//! independent of any particular document format library.

use crate::error::Result;
use crate::record::RangeRecord;

/// Destination-building backend driven by the engine.
///
/// A copier wraps one source document and one destination under
/// construction. The engine calls [`copy_range`](Self::copy_range) once
/// per manifest record and [`finalize`](Self::finalize) exactly once at
/// the end of a fully successful run. Nothing should reach the
/// filesystem before `finalize`.
pub trait PageCopier {
    /// Number of pages in the source document.
    fn page_count(&self) -> u32;

    /// Append the inclusive page span `page_from..=page_to` of the
    /// source to the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound lies outside the source or the
    /// pages cannot be copied.
    fn copy_range(&mut self, page_from: u32, page_to: u32) -> Result<()>;

    /// Assemble and persist the destination document.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written.
    fn finalize(&mut self) -> Result<()>;
}

/// What a completed reassembly did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceSummary {
    /// Manifest ranges copied
    pub ranges: usize,
    /// Total pages written to the destination
    pub pages: u64,
}

/// Order records for reassembly: ascending by sort key, with records
/// sharing a key kept in manifest order.
///
/// The input is borrowed, not consumed, so callers can still report
/// against the original manifest order afterwards.
#[must_use]
pub fn plan_order(records: &[RangeRecord]) -> Vec<&RangeRecord> {
    let mut ordered: Vec<&RangeRecord> = records.iter().collect();
    // Vec::sort_by_key is stable, which is what keeps equal keys in
    // manifest order.
    ordered.sort_by_key(|record| record.sort_key);
    ordered
}

/// Reassemble the destination by copying every record's span in sort-key
/// order.
///
/// Stops at the first copy failure and returns it without finalizing, so
/// a failed run produces no destination file. An empty manifest is not
/// an error: the destination is finalized with zero pages.
///
/// # Errors
///
/// Returns the first error reported by the copier.
pub fn reassemble<C: PageCopier>(records: &[RangeRecord], copier: &mut C) -> Result<SpliceSummary> {
    let ordered = plan_order(records);

    let mut summary = SpliceSummary::default();
    for record in ordered {
        log::info!(
            "copying pages {} to {} dated {}",
            record.page_from,
            record.page_to,
            record.sort_key
        );
        copier.copy_range(record.page_from, record.page_to)?;
        summary.ranges += 1;
        summary.pages += record.pages();
    }

    copier.finalize()?;
    log::info!(
        "reassembly complete: {} range(s), {} page(s)",
        summary.ranges,
        summary.pages
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PagesortError;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    /// Records every call so tests can assert on order and counts.
    struct MockCopier {
        pages: u32,
        copied: Vec<(u32, u32)>,
        finalized: usize,
    }

    impl MockCopier {
        fn new(pages: u32) -> Self {
            Self {
                pages,
                copied: Vec::new(),
                finalized: 0,
            }
        }
    }

    impl PageCopier for MockCopier {
        fn page_count(&self) -> u32 {
            self.pages
        }

        fn copy_range(&mut self, page_from: u32, page_to: u32) -> Result<()> {
            self.copied.push((page_from, page_to));
            Ok(())
        }

        fn finalize(&mut self) -> Result<()> {
            self.finalized += 1;
            Ok(())
        }
    }

    /// Fails the Nth copy (1-based); finalize fails if `fail_finalize`.
    struct FailingCopier {
        fail_on_copy: Option<usize>,
        fail_finalize: bool,
        copies_attempted: usize,
        finalized: usize,
    }

    impl FailingCopier {
        fn failing_copy(n: usize) -> Self {
            Self {
                fail_on_copy: Some(n),
                fail_finalize: false,
                copies_attempted: 0,
                finalized: 0,
            }
        }

        fn failing_finalize() -> Self {
            Self {
                fail_on_copy: None,
                fail_finalize: true,
                copies_attempted: 0,
                finalized: 0,
            }
        }
    }

    impl PageCopier for FailingCopier {
        fn page_count(&self) -> u32 {
            100
        }

        fn copy_range(&mut self, _page_from: u32, page_to: u32) -> Result<()> {
            self.copies_attempted += 1;
            if self.fail_on_copy == Some(self.copies_attempted) {
                return Err(PagesortError::PageOutOfBounds {
                    page: page_to,
                    total: 100,
                });
            }
            Ok(())
        }

        fn finalize(&mut self) -> Result<()> {
            self.finalized += 1;
            if self.fail_finalize {
                return Err(PagesortError::DestinationWrite {
                    path: "/tmp/out.pdf".into(),
                    message: "disk full".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_plan_order_sorts_by_key_ascending() {
        let records = vec![
            RangeRecord::new(day(9), 1, 3, 2),
            RangeRecord::new(day(2), 4, 7, 3),
            RangeRecord::new(day(5), 8, 8, 4),
        ];
        let ordered = plan_order(&records);
        let rows: Vec<u64> = ordered.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![3, 4, 2]);
    }

    #[test]
    fn test_plan_order_keeps_manifest_order_on_ties() {
        let records = vec![
            RangeRecord::new(day(7), 1, 2, 2),
            RangeRecord::new(day(3), 3, 4, 3),
            RangeRecord::new(day(7), 5, 6, 4),
            RangeRecord::new(day(3), 7, 8, 5),
        ];
        let ordered = plan_order(&records);
        let rows: Vec<u64> = ordered.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![3, 5, 2, 4]);
    }

    #[test]
    fn test_plan_order_empty() {
        assert!(plan_order(&[]).is_empty());
    }

    #[test]
    fn test_reassemble_copies_in_sorted_order() {
        let records = vec![
            RangeRecord::new(day(9), 1, 3, 2),
            RangeRecord::new(day(2), 4, 7, 3),
            RangeRecord::new(day(5), 8, 8, 4),
        ];
        let mut copier = MockCopier::new(8);
        let summary = reassemble(&records, &mut copier).unwrap();

        assert_eq!(copier.copied, vec![(4, 7), (8, 8), (1, 3)]);
        assert_eq!(copier.finalized, 1);
        assert_eq!(summary.ranges, 3);
        assert_eq!(summary.pages, 8);
    }

    #[test]
    fn test_reassemble_empty_manifest_finalizes_once() {
        let records: Vec<RangeRecord> = Vec::new();
        let mut copier = MockCopier::new(5);
        let summary = reassemble(&records, &mut copier).unwrap();

        assert!(copier.copied.is_empty());
        assert_eq!(copier.finalized, 1);
        assert_eq!(summary, SpliceSummary::default());
    }

    #[test]
    fn test_reassemble_stops_at_first_copy_failure() {
        let records = vec![
            RangeRecord::new(day(1), 1, 3, 2),
            RangeRecord::new(day(2), 4, 7, 3),
            RangeRecord::new(day(3), 8, 9, 4),
        ];
        let mut copier = FailingCopier::failing_copy(2);
        let err = reassemble(&records, &mut copier).unwrap_err();

        assert!(matches!(err, PagesortError::PageOutOfBounds { .. }));
        // The second copy failed, the third was never attempted, and the
        // destination was never finalized.
        assert_eq!(copier.copies_attempted, 2);
        assert_eq!(copier.finalized, 0);
    }

    #[test]
    fn test_reassemble_propagates_finalize_failure() {
        let records = vec![RangeRecord::new(day(1), 1, 2, 2)];
        let mut copier = FailingCopier::failing_finalize();
        let err = reassemble(&records, &mut copier).unwrap_err();
        assert!(matches!(err, PagesortError::DestinationWrite { .. }));
    }

    #[test]
    fn test_reassemble_copies_every_declared_page() {
        let records = vec![
            RangeRecord::new(day(4), 1, 2, 2),
            RangeRecord::new(day(1), 3, 5, 3),
            RangeRecord::new(day(8), 6, 6, 4),
        ];
        let mut copier = MockCopier::new(6);
        let summary = reassemble(&records, &mut copier).unwrap();

        let mut pages: Vec<u32> = copier
            .copied
            .iter()
            .flat_map(|&(from, to)| from..=to)
            .collect();
        pages.sort_unstable();
        assert_eq!(pages, (1..=6).collect::<Vec<u32>>());
        assert_eq!(summary.pages, 6);
    }

    #[test]
    fn test_reassemble_ignores_manifest_order_for_copying() {
        // Same dates reversed in the file still produce date order.
        let records = vec![
            RangeRecord::new(day(3), 5, 6, 2),
            RangeRecord::new(day(2), 3, 4, 3),
            RangeRecord::new(day(1), 1, 2, 4),
        ];
        let mut copier = MockCopier::new(6);
        reassemble(&records, &mut copier).unwrap();
        assert_eq!(copier.copied, vec![(1, 2), (3, 4), (5, 6)]);
    }
}
