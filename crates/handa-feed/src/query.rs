//! Typed feed query surface: sort fields, direction, pagination window,
//! and the query struct itself. Queries are immutable values: the builder
//! takes a query in and hands a result out, with no shared cursor state.

use handa_core::model::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub use handa_core::page::Page;

/// Sortable feed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedSort {
    /// Post creation time (the default).
    #[default]
    Created,
    /// Number of verification passes.
    Verifications,
    /// Highest verified-item claim.
    VerifiedItems,
}

impl FeedSort {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Verifications => "verifications",
            Self::VerifiedItems => "verified-items",
        }
    }
}

impl fmt::Display for FeedSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedSort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" | "created-at" | "newest" => Ok(Self::Created),
            "verifications" | "verification-count" => Ok(Self::Verifications),
            "verified-items" | "verified" => Ok(Self::VerifiedItems),
            _ => Err(ParseEnumError {
                expected: "feed sort field",
                got: s.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDir {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseEnumError {
                expected: "sort direction",
                got: s.to_string(),
            }),
        }
    }
}

/// A complete feed request. Locality scope: when both `city` and
/// `barangay` are given, rows must match both; barangay names repeat
/// across cities, so a barangay match alone is deliberately insufficient.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedQuery {
    pub city: Option<String>,
    pub barangay: Option<String>,
    /// Case-insensitive substring, OR-combined over caption, snapshot item
    /// names/categories, and household display name.
    pub search: Option<String>,
    pub sort: FeedSort,
    pub order: SortDir,
    pub page: Page,
    /// Keep only the most recent post per household.
    pub unique_per_household: bool,
}
