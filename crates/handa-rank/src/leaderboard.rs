//! Locality-scoped leaderboards.
//!
//! Ranks are assigned over the fully materialized barangay population,
//! sorted by metric value descending with household id as the tie-break.
//! A name search narrows the displayed rows only: rank numbers are fixed
//! before the search filter runs, so a household keeps its true standing
//! no matter how the view is narrowed.

use anyhow::{Context, Result, bail};
use handa_core::error::EngineError;
use handa_core::model::ParseEnumError;
use handa_core::model::household::Household;
use handa_core::page::Page;
use handa_core::store::household;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Point metric a leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Combined total across every point source.
    #[default]
    AllTime,
    /// Go-bag points only.
    GoBag,
}

impl Metric {
    const fn as_str(self) -> &'static str {
        match self {
            Self::AllTime => "all-time",
            Self::GoBag => "go-bag",
        }
    }

    /// Metric value for one household.
    #[must_use]
    pub const fn value_for(self, household: &Household) -> i64 {
        match self {
            Self::AllTime => household.points.all_time(),
            Self::GoBag => household.points.go_bag,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all-time" | "alltime" | "overall" => Ok(Self::AllTime),
            "go-bag" | "gobag" | "bag" => Ok(Self::GoBag),
            _ => Err(ParseEnumError {
                expected: "leaderboard metric",
                got: s.to_string(),
            }),
        }
    }
}

/// A leaderboard request. Always locality-scoped: the barangay code is
/// required and validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub barangay: String,
    pub metric: Metric,
    /// Case-insensitive substring filter on the display name. Narrows the
    /// rows shown, never the rank numbers.
    pub search: Option<String>,
    pub page: Page,
}

impl LeaderboardQuery {
    /// Build a query with a validated locality scope.
    ///
    /// # Errors
    ///
    /// `Validation` when the barangay code is empty.
    pub fn new(barangay: impl Into<String>, metric: Metric) -> Result<Self, EngineError> {
        let barangay = barangay.into();
        if barangay.trim().is_empty() {
            return Err(EngineError::Validation(
                "leaderboards require a non-empty barangay code".to_string(),
            ));
        }

        Ok(Self {
            barangay,
            metric,
            search: None,
            page: Page::default(),
        })
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedHousehold {
    /// 1-based standing in the full barangay population.
    pub rank: usize,
    pub household_id: String,
    pub display_name: String,
    pub metric_value: i64,
}

/// A leaderboard page plus the total row count after the search filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResult {
    pub data: Vec<RankedHousehold>,
    pub total: usize,
}

/// Build one leaderboard page for `query`.
///
/// Pure read over a point-in-time snapshot of storage; no locking, no
/// internal retries.
///
/// # Errors
///
/// Returns an error when the barangay code is empty or a database query
/// fails.
pub fn build_leaderboard(
    conn: &Connection,
    query: &LeaderboardQuery,
) -> Result<LeaderboardResult> {
    if query.barangay.trim().is_empty() {
        bail!("leaderboards require a non-empty barangay code");
    }

    let population = household::list_by_barangay(conn, &query.barangay)
        .context("materialize barangay population")?;

    tracing::debug!(
        barangay = %query.barangay,
        metric = %query.metric,
        population = population.len(),
        "leaderboard population materialized"
    );

    // Rank the whole population first; the search filter must not renumber.
    let mut standings: Vec<(i64, Household)> = population
        .into_iter()
        .map(|h| (query.metric.value_for(&h), h))
        .collect();
    standings.sort_by(|(a_value, a), (b_value, b)| {
        b_value
            .cmp(a_value)
            .then_with(|| a.household_id.cmp(&b.household_id))
    });

    let ranked = standings
        .into_iter()
        .enumerate()
        .map(|(position, (metric_value, h))| RankedHousehold {
            rank: position + 1,
            household_id: h.household_id,
            display_name: h.display_name,
            metric_value,
        });

    let filtered: Vec<RankedHousehold> = match query.search.as_deref() {
        Some(needle) if !needle.is_empty() => {
            let needle = needle.to_lowercase();
            ranked
                .filter(|row| row.display_name.to_lowercase().contains(&needle))
                .collect()
        }
        _ => ranked.collect(),
    };

    let total = filtered.len();
    let data = filtered
        .into_iter()
        .skip(query.page.skip())
        .take(query.page.limit() as usize)
        .collect();

    Ok(LeaderboardResult { data, total })
}

#[cfg(test)]
mod tests {
    use super::{LeaderboardQuery, Metric, build_leaderboard};
    use handa_core::db::open_in_memory;
    use handa_core::error::EngineError;
    use handa_core::model::household::{NewHousehold, PointSource};
    use handa_core::page::Page;
    use handa_core::store::household;
    use rusqlite::Connection;
    use std::str::FromStr;

    fn register_with_points(
        conn: &Connection,
        id: &str,
        name: &str,
        barangay: &str,
        go_bag: i64,
        modules: i64,
    ) {
        household::register(
            conn,
            &NewHousehold {
                household_id: id.to_string(),
                display_name: name.to_string(),
                city_code: "quezon-city".to_string(),
                barangay_code: barangay.to_string(),
                profile_image: None,
            },
        )
        .expect("register household");

        if go_bag > 0 {
            household::add_points(conn, id, PointSource::GoBag, go_bag).expect("award go-bag");
        }
        if modules > 0 {
            household::add_points(conn, id, PointSource::Modules, modules)
                .expect("award modules");
        }
    }

    fn seeded() -> Connection {
        let conn = open_in_memory().expect("open db");
        register_with_points(&conn, "hh-cruz", "Pamilya Cruz", "qc-batasan", 50, 30);
        register_with_points(&conn, "hh-reyes", "Pamilya Reyes", "qc-batasan", 90, 0);
        register_with_points(&conn, "hh-santos", "Pamilya Santos", "qc-batasan", 20, 100);
        register_with_points(&conn, "hh-tan", "Pamilya Tan", "qc-commonwealth", 999, 0);
        conn
    }

    #[test]
    fn metric_parse_roundtrips_and_rejects_unknown() {
        for metric in [Metric::AllTime, Metric::GoBag] {
            assert_eq!(Metric::from_str(&metric.to_string()).unwrap(), metric);
        }
        assert_eq!(Metric::from_str("overall").unwrap(), Metric::AllTime);
        assert!(Metric::from_str("streak").is_err());
    }

    #[test]
    fn query_requires_a_barangay() {
        assert!(matches!(
            LeaderboardQuery::new("", Metric::AllTime),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            LeaderboardQuery::new("   ", Metric::GoBag),
            Err(EngineError::Validation(_))
        ));
        assert!(LeaderboardQuery::new("qc-batasan", Metric::AllTime).is_ok());
    }

    #[test]
    fn all_time_ranks_by_summed_points_within_the_barangay() {
        let conn = seeded();
        let query = LeaderboardQuery::new("qc-batasan", Metric::AllTime).expect("query");

        let result = build_leaderboard(&conn, &query).expect("build");

        assert_eq!(result.total, 3, "other barangays never leak in");
        let rows: Vec<_> = result
            .data
            .iter()
            .map(|r| (r.rank, r.household_id.as_str(), r.metric_value))
            .collect();
        // santos 120, reyes 90, cruz 80
        assert_eq!(
            rows,
            [
                (1, "hh-santos", 120),
                (2, "hh-reyes", 90),
                (3, "hh-cruz", 80)
            ]
        );
    }

    #[test]
    fn go_bag_metric_reorders_the_same_population() {
        let conn = seeded();
        let query = LeaderboardQuery::new("qc-batasan", Metric::GoBag).expect("query");

        let result = build_leaderboard(&conn, &query).expect("build");
        let rows: Vec<_> = result
            .data
            .iter()
            .map(|r| (r.rank, r.household_id.as_str(), r.metric_value))
            .collect();
        assert_eq!(
            rows,
            [
                (1, "hh-reyes", 90),
                (2, "hh-cruz", 50),
                (3, "hh-santos", 20)
            ]
        );
    }

    #[test]
    fn equal_metric_values_tie_break_on_household_id() {
        let conn = open_in_memory().expect("open db");
        register_with_points(&conn, "hh-b", "Bravo", "qc-batasan", 10, 0);
        register_with_points(&conn, "hh-a", "Alpha", "qc-batasan", 10, 0);
        register_with_points(&conn, "hh-c", "Charlie", "qc-batasan", 10, 0);

        let query = LeaderboardQuery::new("qc-batasan", Metric::GoBag).expect("query");
        let result = build_leaderboard(&conn, &query).expect("build");

        let ids: Vec<_> = result.data.iter().map(|r| r.household_id.as_str()).collect();
        assert_eq!(ids, ["hh-a", "hh-b", "hh-c"]);

        let ranks: Vec<_> = result.data.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, [1, 2, 3], "ranks are dense and 1-based");
    }

    #[test]
    fn search_narrows_rows_but_never_renumbers_ranks() {
        let conn = seeded();
        let mut query = LeaderboardQuery::new("qc-batasan", Metric::AllTime).expect("query");
        query.search = Some("cruz".to_string());

        let result = build_leaderboard(&conn, &query).expect("build");

        assert_eq!(result.total, 1);
        assert_eq!(result.data[0].household_id, "hh-cruz");
        assert_eq!(result.data[0].rank, 3, "rank reflects true standing");
    }

    #[test]
    fn rank_is_strictly_increasing_with_position() {
        let conn = seeded();
        let query = LeaderboardQuery::new("qc-batasan", Metric::AllTime).expect("query");
        let result = build_leaderboard(&conn, &query).expect("build");

        for pair in result.data.windows(2) {
            assert!(pair[0].rank < pair[1].rank);
        }
    }

    #[test]
    fn pagination_tiles_the_standings() {
        let conn = open_in_memory().expect("open db");
        for i in 0..7 {
            register_with_points(
                &conn,
                &format!("hh-{i}"),
                &format!("Household {i}"),
                "qc-batasan",
                i64::from(i) * 10,
                0,
            );
        }

        let mut assembled = Vec::new();
        for page_no in 1..=4 {
            let mut query = LeaderboardQuery::new("qc-batasan", Metric::GoBag).expect("query");
            query.page = Page::new(page_no, 2).expect("page");
            let result = build_leaderboard(&conn, &query).expect("build");
            assert_eq!(result.total, 7);
            assembled.extend(result.data.into_iter().map(|r| r.rank));
        }

        assert_eq!(assembled, [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn empty_barangay_code_fails_even_when_bypassing_the_constructor() {
        let conn = seeded();
        let query = LeaderboardQuery {
            barangay: String::new(),
            metric: Metric::AllTime,
            search: None,
            page: Page::default(),
        };
        assert!(build_leaderboard(&conn, &query).is_err());
    }

    #[test]
    fn unknown_barangay_yields_an_empty_board() {
        let conn = seeded();
        let query = LeaderboardQuery::new("qc-novaliches", Metric::AllTime).expect("query");
        let result = build_leaderboard(&conn, &query).expect("build");
        assert_eq!(result.total, 0);
        assert!(result.data.is_empty());
    }

    mod properties {
        use super::register_with_points;
        use crate::leaderboard::{LeaderboardQuery, Metric, build_leaderboard};
        use handa_core::db::open_in_memory;
        use handa_core::page::Page;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// For any point spread, ranks are dense 1..=n and metric
            /// values never increase down the board.
            #[test]
            fn standings_are_dense_and_monotone(points in prop::collection::vec(0i64..500, 1..15)) {
                let conn = open_in_memory().expect("open db");
                for (i, value) in points.iter().enumerate() {
                    register_with_points(
                        &conn,
                        &format!("hh-{i:02}"),
                        &format!("Household {i:02}"),
                        "qc-batasan",
                        *value,
                        0,
                    );
                }

                let mut query =
                    LeaderboardQuery::new("qc-batasan", Metric::GoBag).expect("query");
                query.page = Page::new(1, 100).expect("page");
                let result = build_leaderboard(&conn, &query).expect("build");

                prop_assert_eq!(result.total, points.len());
                for (position, row) in result.data.iter().enumerate() {
                    prop_assert_eq!(row.rank, position + 1);
                }
                for pair in result.data.windows(2) {
                    prop_assert!(pair[0].metric_value >= pair[1].metric_value);
                }
            }
        }
    }
}
