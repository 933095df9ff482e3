//! Validation reports.
//!
//! A report is structured data, not a log line: callers can count, match,
//! and serialize the findings, then decide for themselves whether to
//! proceed with reassembly.

use serde::Serialize;
use std::fmt;

/// Why a manifest row failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The row's span runs backwards (`page_to < page_from`).
    InvertedRange { page_from: u32, page_to: u32 },

    /// The row does not start exactly one page after its predecessor
    /// ends. Covers both gaps and overlaps.
    NotAdjacent { page_from: u32, prev_page_to: u32 },

    /// Strict check: the first row does not start at page 1.
    FirstPageNotOne { page_from: u32 },

    /// Strict check: the last row does not end at the source's final page.
    ShortCoverage { page_to: u32, expected: u32 },
}

/// A single validation finding, tied to a manifest file line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// 1-based manifest line the finding refers to.
    pub row: u64,

    /// What went wrong on that line.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::InvertedRange { page_from, page_to } => write!(
                f,
                "row {}: page range runs backwards (from {page_from} to {page_to})",
                self.row
            ),
            ViolationKind::NotAdjacent {
                page_from,
                prev_page_to,
            } => write!(
                f,
                "row {}: starts at page {page_from} but the previous range ended at page {prev_page_to}",
                self.row
            ),
            ViolationKind::FirstPageNotOne { page_from } => write!(
                f,
                "row {}: first range starts at page {page_from}, expected page 1",
                self.row
            ),
            ViolationKind::ShortCoverage { page_to, expected } => write!(
                f,
                "row {}: last range ends at page {page_to} but the source ends at page {expected}",
                self.row
            ),
        }
    }
}

/// Outcome of validating a manifest: every violation found, in row order.
///
/// The validator never stops at the first finding, so an invalid report
/// lists all bad rows. Two validations of the same input produce equal
/// reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Whether the manifest passed every check.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every finding, in row order.
    #[inline]
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub(crate) fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "no violations");
        }
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
