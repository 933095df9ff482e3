//! Manifest range records.
//!
//! A manifest row names a contiguous, 1-based, inclusive span of source
//! pages plus the date used to order that span in the output. Records also
//! keep their original file position so diagnostics can point at the line
//! a user actually sees in their spreadsheet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One manifest row: a contiguous page span and its sort key.
///
/// `page_from` and `page_to` are 1-based and inclusive, matching how page
/// numbers appear in a viewer. `sort_key` determines output order only and
/// is not required to be unique; ranges sharing a date keep their manifest
/// order. `row` is the record's line number in the manifest file (header
/// line included in the count) and is used solely for diagnostics, never
/// for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRecord {
    /// Date that orders this span in the output.
    pub sort_key: NaiveDate,

    /// First page of the span, 1-based, inclusive.
    pub page_from: u32,

    /// Last page of the span, 1-based, inclusive.
    pub page_to: u32,

    /// 1-based line number in the manifest file.
    pub row: u64,
}

impl RangeRecord {
    /// Create a record.
    #[inline]
    #[must_use]
    pub const fn new(sort_key: NaiveDate, page_from: u32, page_to: u32, row: u64) -> Self {
        Self {
            sort_key,
            page_from,
            page_to,
            row,
        }
    }

    /// Number of pages the span covers. An inverted span covers zero.
    #[inline]
    #[must_use = "returns the span length without modifying the record"]
    pub const fn pages(&self) -> u64 {
        if self.page_to >= self.page_from {
            (self.page_to - self.page_from) as u64 + 1
        } else {
            0
        }
    }

    /// Whether the span runs forwards (`page_from <= page_to`).
    #[inline]
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.page_from <= self.page_to
    }
}

impl fmt::Display for RangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pages {}-{} dated {}",
            self.page_from, self.page_to, self.sort_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).expect("valid test date")
    }

    #[test]
    fn test_new_sets_all_fields() {
        let record = RangeRecord::new(date(5), 1, 10, 2);
        assert_eq!(record.sort_key, date(5));
        assert_eq!(record.page_from, 1);
        assert_eq!(record.page_to, 10);
        assert_eq!(record.row, 2);
    }

    #[test]
    fn test_pages_inclusive_span() {
        let record = RangeRecord::new(date(1), 3, 7, 2);
        assert_eq!(record.pages(), 5, "3..=7 covers five pages");
    }

    #[test]
    fn test_pages_single_page_span() {
        let record = RangeRecord::new(date(1), 4, 4, 2);
        assert_eq!(record.pages(), 1);
    }

    #[test]
    fn test_pages_inverted_span_is_zero() {
        let record = RangeRecord::new(date(1), 7, 3, 2);
        assert_eq!(record.pages(), 0, "an inverted span covers no pages");
    }

    #[test]
    fn test_is_well_formed() {
        assert!(RangeRecord::new(date(1), 1, 1, 2).is_well_formed());
        assert!(RangeRecord::new(date(1), 2, 9, 2).is_well_formed());
        assert!(!RangeRecord::new(date(1), 9, 2, 2).is_well_formed());
    }

    #[test]
    fn test_display_names_span_and_date() {
        let record = RangeRecord::new(date(15), 6, 10, 3);
        assert_eq!(format!("{record}"), "pages 6-10 dated 2024-03-15");
    }

    #[test]
    fn test_records_are_copy_and_comparable() {
        let a = RangeRecord::new(date(1), 1, 5, 2);
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, RangeRecord::new(date(1), 1, 5, 3), "row participates in equality");
    }

    #[test]
    fn test_serialize_field_names() {
        let record = RangeRecord::new(date(2), 1, 5, 2);
        let json = serde_json::to_value(record).expect("record serializes");
        assert_eq!(json["sort_key"], "2024-03-02");
        assert_eq!(json["page_from"], 1);
        assert_eq!(json["page_to"], 5);
        assert_eq!(json["row"], 2);
    }

    #[test]
    fn test_deserialize_round_trip() {
        let record = RangeRecord::new(date(9), 11, 20, 4);
        let json = serde_json::to_string(&record).expect("record serializes");
        let back: RangeRecord = serde_json::from_str(&json).expect("record deserializes");
        assert_eq!(back, record);
    }
}
