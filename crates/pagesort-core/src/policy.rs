//! Run policies and validation options.
//!
//! The engine never asks questions at runtime. Callers decide up front what
//! happens when a manifest fails validation and when the destination already
//! exists, and pass those decisions in as policy values.

use serde::{Deserialize, Serialize};

/// What to do when the manifest fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnInvalid {
    /// Stop before touching the source document
    #[default]
    Abort,
    /// Reassemble anyway, in manifest-declared ranges
    Proceed,
}

impl std::fmt::Display for OnInvalid {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Abort => "abort",
            Self::Proceed => "proceed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OnInvalid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" | "stop" => Ok(Self::Abort),
            "proceed" | "continue" => Ok(Self::Proceed),
            _ => Err(format!("unknown validation policy: '{s}'")),
        }
    }
}

/// What to do when the destination file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnExisting {
    /// Treat the existing file as an error
    #[default]
    Fail,
    /// Leave the existing file alone and finish without reassembling
    Abort,
    /// Replace the existing file
    Overwrite,
}

impl std::fmt::Display for OnExisting {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fail => "fail",
            Self::Abort => "abort",
            Self::Overwrite => "overwrite",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OnExisting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" | "error" => Ok(Self::Fail),
            "abort" | "skip" => Ok(Self::Abort),
            "overwrite" | "force" | "replace" => Ok(Self::Overwrite),
            _ => Err(format!("unknown destination policy: '{s}'")),
        }
    }
}

/// Options controlling how strict manifest validation is.
///
/// The baseline checks (no inverted ranges, consecutive ranges adjacent)
/// always run. These options add coverage checks on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Require the first range to start at page 1
    pub require_first_page: bool,

    /// Require the last range to end at this page, typically the source's
    /// page count
    pub expected_last_page: Option<u32>,
}

impl ValidationOptions {
    /// Create options with every strict check disabled.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            require_first_page: false,
            expected_last_page: None,
        }
    }

    /// Set whether the first range must start at page 1.
    #[inline]
    #[must_use = "returns options with the first-page check configured"]
    pub const fn with_first_page_check(mut self, require: bool) -> Self {
        self.require_first_page = require;
        self
    }

    /// Require the last range to end at `page`.
    #[inline]
    #[must_use = "returns options with an expected last page configured"]
    pub const fn with_expected_last_page(mut self, page: u32) -> Self {
        self.expected_last_page = Some(page);
        self
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_on_invalid_default_is_abort() {
        assert_eq!(OnInvalid::default(), OnInvalid::Abort);
    }

    #[test]
    fn test_on_existing_default_is_fail() {
        assert_eq!(OnExisting::default(), OnExisting::Fail);
    }

    #[test]
    fn test_on_invalid_from_str() {
        assert_eq!(OnInvalid::from_str("abort").unwrap(), OnInvalid::Abort);
        assert_eq!(OnInvalid::from_str("proceed").unwrap(), OnInvalid::Proceed);
        assert_eq!(OnInvalid::from_str("continue").unwrap(), OnInvalid::Proceed);
        assert_eq!(OnInvalid::from_str("ABORT").unwrap(), OnInvalid::Abort);
        assert!(OnInvalid::from_str("maybe").is_err());
    }

    #[test]
    fn test_on_existing_from_str() {
        assert_eq!(OnExisting::from_str("fail").unwrap(), OnExisting::Fail);
        assert_eq!(OnExisting::from_str("skip").unwrap(), OnExisting::Abort);
        assert_eq!(
            OnExisting::from_str("overwrite").unwrap(),
            OnExisting::Overwrite
        );
        assert_eq!(OnExisting::from_str("force").unwrap(), OnExisting::Overwrite);
        assert!(OnExisting::from_str("ask").is_err());
    }

    #[test]
    fn test_policy_display_round_trip() {
        for policy in [OnInvalid::Abort, OnInvalid::Proceed] {
            let parsed = OnInvalid::from_str(&policy.to_string()).unwrap();
            assert_eq!(parsed, policy);
        }
        for policy in [OnExisting::Fail, OnExisting::Abort, OnExisting::Overwrite] {
            let parsed = OnExisting::from_str(&policy.to_string()).unwrap();
            assert_eq!(parsed, policy);
        }
    }

    #[test]
    fn test_policy_serde_lowercase() {
        let json = serde_json::to_string(&OnExisting::Overwrite).unwrap();
        assert_eq!(json, "\"overwrite\"");
        let back: OnExisting = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(back, OnExisting::Abort);
    }

    #[test]
    fn test_validation_options_default_is_lenient() {
        let options = ValidationOptions::default();
        assert!(!options.require_first_page);
        assert!(options.expected_last_page.is_none());
    }

    #[test]
    fn test_validation_options_builders() {
        let options = ValidationOptions::new()
            .with_first_page_check(true)
            .with_expected_last_page(48);
        assert!(options.require_first_page);
        assert_eq!(options.expected_last_page, Some(48));
    }

    #[test]
    fn test_validation_options_const_in_const_context() {
        const OPTIONS: ValidationOptions = ValidationOptions::new().with_first_page_check(true);
        assert!(OPTIONS.require_first_page);
    }
}
