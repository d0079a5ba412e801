//! Go-bag completeness scoring.
//!
//! The score is the percentage of canonical checklist items a household
//! currently holds, always an integer in `[0, 100]`. Callers supply
//! consistent counts; this module has no storage access.

use serde::{Deserialize, Serialize};

/// Minimum score for the fully-prepared readiness bucket.
pub const FULLY_PREPARED_MIN: u8 = 80;

/// Minimum score for the partially-prepared readiness bucket.
pub const PARTIALLY_PREPARED_MIN: u8 = 40;

/// Compute the completeness percentage for `held_count` of `catalog_size`
/// checklist items.
///
/// A zero-item catalog scores 0 rather than dividing by zero. Held counts
/// above the catalog size (stale catalog references) clamp to 100.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn completeness(held_count: usize, catalog_size: usize) -> u8 {
    if catalog_size == 0 {
        return 0;
    }

    let pct = (held_count as f64 / catalog_size as f64) * 100.0;
    pct.round().clamp(0.0, 100.0) as u8
}

/// Readiness bucket a completeness score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadinessBucket {
    FullyPrepared,
    PartiallyPrepared,
    AtRisk,
}

impl ReadinessBucket {
    /// Bucket a completeness score: `>= 80` fully prepared, `40..=79`
    /// partially prepared, `< 40` at risk.
    #[must_use]
    pub const fn for_score(score: u8) -> Self {
        if score >= FULLY_PREPARED_MIN {
            Self::FullyPrepared
        } else if score >= PARTIALLY_PREPARED_MIN {
            Self::PartiallyPrepared
        } else {
            Self::AtRisk
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadinessBucket, completeness};
    use proptest::prelude::*;

    #[test]
    fn empty_bag_scores_zero() {
        for catalog_size in [0, 1, 10, 250] {
            assert_eq!(completeness(0, catalog_size), 0);
        }
    }

    #[test]
    fn full_bag_scores_one_hundred() {
        for n in [1, 7, 10, 99] {
            assert_eq!(completeness(n, n), 100);
        }
    }

    #[test]
    fn empty_catalog_scores_zero_for_any_held_count() {
        for held in [0, 1, 3, 500] {
            assert_eq!(completeness(held, 0), 0);
        }
    }

    #[test]
    fn three_of_ten_scores_thirty() {
        assert_eq!(completeness(3, 10), 30);
    }

    #[test]
    fn rounds_to_nearest_percent() {
        // 1/3 -> 33.33 -> 33; 2/3 -> 66.67 -> 67
        assert_eq!(completeness(1, 3), 33);
        assert_eq!(completeness(2, 3), 67);
        // 1/8 -> 12.5 rounds half away from zero -> 13
        assert_eq!(completeness(1, 8), 13);
    }

    #[test]
    fn stale_references_clamp_to_one_hundred() {
        assert_eq!(completeness(12, 10), 100);
    }

    #[test]
    fn buckets_split_at_documented_thresholds() {
        assert_eq!(ReadinessBucket::for_score(100), ReadinessBucket::FullyPrepared);
        assert_eq!(ReadinessBucket::for_score(80), ReadinessBucket::FullyPrepared);
        assert_eq!(ReadinessBucket::for_score(79), ReadinessBucket::PartiallyPrepared);
        assert_eq!(ReadinessBucket::for_score(40), ReadinessBucket::PartiallyPrepared);
        assert_eq!(ReadinessBucket::for_score(39), ReadinessBucket::AtRisk);
        assert_eq!(ReadinessBucket::for_score(0), ReadinessBucket::AtRisk);
    }

    proptest! {
        #[test]
        fn score_is_always_in_percent_range(held in 0usize..10_000, size in 0usize..10_000) {
            let score = completeness(held, size);
            prop_assert!(score <= 100);
        }

        #[test]
        fn score_is_monotone_in_held_count(held in 0usize..500, size in 1usize..500) {
            prop_assert!(completeness(held, size) <= completeness(held + 1, size));
        }
    }
}
