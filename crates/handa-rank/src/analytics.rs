//! LGU analytics rollups for one locality: the readiness distribution of
//! households with go-bag records, and the item-frequency breakdown across
//! those bags.

use anyhow::{Context, Result};
use handa_core::score::{ReadinessBucket, completeness};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

/// Locality-wide readiness buckets. `total` counts households with at
/// least a go-bag record; the three buckets always sum to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessDistribution {
    pub fully_prepared: usize,
    pub partially_prepared: usize,
    pub at_risk: usize,
    pub total: usize,
}

/// How many bags in the locality hold one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFrequency {
    pub item_id: String,
    pub item_name: String,
    pub raw_count: usize,
    /// Share of active bags holding the item, rounded to whole percent.
    pub percentage: u8,
}

/// Bucket every household in the barangay that has a go-bag record by its
/// completeness score against `catalog_size`.
///
/// A locality with no bags yields the zero distribution; callers render an
/// empty state rather than dividing by anything.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn readiness_distribution(
    conn: &Connection,
    barangay: &str,
    catalog_size: usize,
) -> Result<ReadinessDistribution> {
    let mut stmt = conn
        .prepare(
            "SELECT COUNT(gi.item_id)
             FROM go_bags g
             INNER JOIN households h ON h.household_id = g.household_id
             LEFT JOIN go_bag_items gi ON gi.household_id = g.household_id
             WHERE h.barangay_code = ?1
             GROUP BY g.household_id",
        )
        .context("prepare readiness rollup")?;

    let held_counts = stmt
        .query_map(params![barangay], |row| row.get::<_, i64>(0))
        .context("execute readiness rollup")?;

    let mut distribution = ReadinessDistribution::default();
    for held in held_counts {
        let held = usize::try_from(held.context("read held count")?).unwrap_or(0);
        let score = completeness(held, catalog_size);
        match ReadinessBucket::for_score(score) {
            ReadinessBucket::FullyPrepared => distribution.fully_prepared += 1,
            ReadinessBucket::PartiallyPrepared => distribution.partially_prepared += 1,
            ReadinessBucket::AtRisk => distribution.at_risk += 1,
        }
        distribution.total += 1;
    }

    tracing::debug!(barangay, total = distribution.total, "readiness distribution built");
    Ok(distribution)
}

/// Count, for every catalog item, how many bags in the barangay hold it.
///
/// Items held by no bag are included with a zero count so dashboards can
/// render the full checklist. Sorted by raw count descending, item name
/// ascending on ties. The full list is returned; pagination is a
/// presentation concern.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn item_breakdown(conn: &Connection, barangay: &str) -> Result<Vec<ItemFrequency>> {
    let active_bags: i64 = conn
        .query_row(
            "SELECT COUNT(*)
             FROM go_bags g
             INNER JOIN households h ON h.household_id = g.household_id
             WHERE h.barangay_code = ?1",
            params![barangay],
            |row| row.get(0),
        )
        .context("count active bags")?;

    // Guard the percentage denominator; zero active bags yields 0% rows.
    let denominator = active_bags.max(1);

    let mut stmt = conn
        .prepare(
            "SELECT ci.item_id, ci.name, COUNT(held.household_id) AS raw_count
             FROM catalog_items ci
             LEFT JOIN (
                 SELECT gi.item_id, gi.household_id
                 FROM go_bag_items gi
                 INNER JOIN households h ON h.household_id = gi.household_id
                 WHERE h.barangay_code = ?1
             ) held ON held.item_id = ci.item_id
             GROUP BY ci.item_id, ci.name
             ORDER BY raw_count DESC, ci.name ASC",
        )
        .context("prepare item breakdown")?;

    let rows = stmt
        .query_map(params![barangay], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })
        .context("execute item breakdown")?;

    let mut breakdown = Vec::new();
    for row in rows {
        let (item_id, item_name, raw) = row.context("read breakdown row")?;
        let raw_count = usize::try_from(raw).unwrap_or(0);
        breakdown.push(ItemFrequency {
            item_id,
            item_name,
            raw_count,
            percentage: percentage_of(raw, denominator),
        });
    }

    Ok(breakdown)
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage_of(raw: i64, denominator: i64) -> u8 {
    let pct = (raw as f64 / denominator as f64) * 100.0;
    pct.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{item_breakdown, readiness_distribution};
    use handa_core::db::open_in_memory;
    use handa_core::model::catalog::CatalogItem;
    use handa_core::model::household::NewHousehold;
    use handa_core::store::{catalog, gobag, household};
    use rusqlite::Connection;

    const CATALOG_SIZE: usize = 20;

    fn seeded() -> Connection {
        let conn = open_in_memory().expect("open db");

        let items: Vec<CatalogItem> = (0..CATALOG_SIZE)
            .map(|i| CatalogItem {
                item_id: format!("item-{i:02}"),
                name: format!("Checklist item {i:02}"),
                category: "General".to_string(),
            })
            .collect();
        catalog::insert_items(&conn, &items).expect("load catalog");

        conn
    }

    fn register(conn: &Connection, id: &str, barangay: &str) {
        household::register(
            conn,
            &NewHousehold {
                household_id: id.to_string(),
                display_name: format!("Household {id}"),
                city_code: "quezon-city".to_string(),
                barangay_code: barangay.to_string(),
                profile_image: None,
            },
        )
        .expect("register household");
    }

    fn fill_bag(conn: &mut Connection, id: &str, held: usize) {
        for i in 0..held {
            gobag::add_item(conn, id, &format!("item-{i:02}")).expect("add item");
        }
    }

    #[test]
    fn distribution_buckets_scores_at_documented_thresholds() {
        let mut conn = seeded();
        // 17/20 = 85, 10/20 = 50, 2/20 = 10
        register(&conn, "hh-full", "qc-batasan");
        fill_bag(&mut conn, "hh-full", 17);
        register(&conn, "hh-partial", "qc-batasan");
        fill_bag(&mut conn, "hh-partial", 10);
        register(&conn, "hh-risk", "qc-batasan");
        fill_bag(&mut conn, "hh-risk", 2);

        let dist = readiness_distribution(&conn, "qc-batasan", CATALOG_SIZE).expect("rollup");

        assert_eq!(dist.fully_prepared, 1);
        assert_eq!(dist.partially_prepared, 1);
        assert_eq!(dist.at_risk, 1);
        assert_eq!(dist.total, 3);
    }

    #[test]
    fn buckets_always_sum_to_total() {
        let mut conn = seeded();
        for i in 0..9 {
            let id = format!("hh-{i}");
            register(&conn, &id, "qc-batasan");
            fill_bag(&mut conn, &id, i * 2);
        }

        let dist = readiness_distribution(&conn, "qc-batasan", CATALOG_SIZE).expect("rollup");
        assert_eq!(
            dist.fully_prepared + dist.partially_prepared + dist.at_risk,
            dist.total
        );
        assert_eq!(dist.total, 9);
    }

    #[test]
    fn empty_locality_is_all_zeros_not_an_error() {
        let conn = seeded();
        let dist = readiness_distribution(&conn, "qc-nowhere", CATALOG_SIZE).expect("rollup");
        assert_eq!(dist, super::ReadinessDistribution::default());
    }

    #[test]
    fn households_without_bags_are_not_counted() {
        let mut conn = seeded();
        register(&conn, "hh-bagless", "qc-batasan");
        register(&conn, "hh-bagged", "qc-batasan");
        fill_bag(&mut conn, "hh-bagged", 1);

        let dist = readiness_distribution(&conn, "qc-batasan", CATALOG_SIZE).expect("rollup");
        assert_eq!(dist.total, 1, "only households with a go-bag record count");
    }

    #[test]
    fn empty_bags_count_as_at_risk() {
        let conn = seeded();
        register(&conn, "hh-empty", "qc-batasan");
        gobag::get_or_create(&conn, "hh-empty").expect("create empty bag");

        let dist = readiness_distribution(&conn, "qc-batasan", CATALOG_SIZE).expect("rollup");
        assert_eq!(dist.at_risk, 1);
        assert_eq!(dist.total, 1);
    }

    #[test]
    fn breakdown_counts_sorts_and_scores_percentages() {
        let mut conn = seeded();
        register(&conn, "hh-a", "qc-batasan");
        register(&conn, "hh-b", "qc-batasan");
        register(&conn, "hh-c", "qc-batasan");
        // item-00 in 3 bags, item-01 in 2, item-02 in 1.
        fill_bag(&mut conn, "hh-a", 3);
        fill_bag(&mut conn, "hh-b", 2);
        fill_bag(&mut conn, "hh-c", 1);

        let breakdown = item_breakdown(&conn, "qc-batasan").expect("breakdown");

        assert_eq!(breakdown.len(), CATALOG_SIZE, "zero-count items included");
        assert_eq!(breakdown[0].item_id, "item-00");
        assert_eq!(breakdown[0].raw_count, 3);
        assert_eq!(breakdown[0].percentage, 100);
        assert_eq!(breakdown[1].raw_count, 2);
        assert_eq!(breakdown[1].percentage, 67);
        assert_eq!(breakdown[2].raw_count, 1);
        assert_eq!(breakdown[2].percentage, 33);
        assert_eq!(breakdown[3].raw_count, 0);
        assert_eq!(breakdown[3].percentage, 0);
    }

    #[test]
    fn breakdown_ties_sort_by_item_name() {
        let mut conn = seeded();
        register(&conn, "hh-a", "qc-batasan");
        fill_bag(&mut conn, "hh-a", 2); // item-00 and item-01 both count 1

        let breakdown = item_breakdown(&conn, "qc-batasan").expect("breakdown");
        assert_eq!(breakdown[0].item_name, "Checklist item 00");
        assert_eq!(breakdown[1].item_name, "Checklist item 01");
    }

    #[test]
    fn breakdown_with_no_active_bags_is_all_zero_percent() {
        let conn = seeded();
        let breakdown = item_breakdown(&conn, "qc-batasan").expect("breakdown");
        assert_eq!(breakdown.len(), CATALOG_SIZE);
        assert!(breakdown.iter().all(|row| row.raw_count == 0 && row.percentage == 0));
    }

    #[test]
    fn breakdown_is_scoped_to_the_barangay() {
        let mut conn = seeded();
        register(&conn, "hh-inside", "qc-batasan");
        fill_bag(&mut conn, "hh-inside", 1);
        register(&conn, "hh-outside", "qc-commonwealth");
        fill_bag(&mut conn, "hh-outside", 5);

        let breakdown = item_breakdown(&conn, "qc-batasan").expect("breakdown");
        let held: usize = breakdown.iter().map(|row| row.raw_count).sum();
        assert_eq!(held, 1, "neighboring barangays never leak in");
    }
}
