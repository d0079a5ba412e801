//! Apply a generated fixture to a database through the public store
//! operations, exactly as request handlers would.

use crate::fixture::Fixture;
use anyhow::{Context, Result};
use handa_core::model::household::PointSource;
use handa_core::model::post::NewPost;
use handa_core::store::{catalog, gobag, household, post, report};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// What a seeding pass created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub catalog_items: usize,
    pub households: usize,
    pub bag_items: usize,
    pub posts: usize,
    pub reports: usize,
}

/// Seed `conn` from `fixture`. Idempotent on the catalog; households are
/// inserted fresh and collide with a prior seed of the same fixture.
///
/// # Errors
///
/// Returns an error when any underlying store operation fails.
pub fn seed_database(conn: &mut Connection, fixture: &Fixture) -> Result<SeedSummary> {
    let mut summary = SeedSummary {
        catalog_items: catalog::insert_items(conn, &fixture.catalog)
            .context("seed catalog")?,
        ..SeedSummary::default()
    };

    let mut reportable_posts = Vec::new();

    for (index, entry) in fixture.households.iter().enumerate() {
        household::register(conn, &entry.household)
            .with_context(|| format!("seed household '{}'", entry.household.household_id))?;
        summary.households += 1;

        let id = entry.household.household_id.as_str();

        for item_id in &entry.bag_items {
            gobag::add_item(conn, id, item_id)
                .with_context(|| format!("seed bag item '{item_id}' for '{id}'"))?;
            summary.bag_items += 1;
        }

        if entry.go_bag_points > 0 {
            household::add_points(conn, id, PointSource::GoBag, entry.go_bag_points)
                .context("seed go-bag points")?;
        }
        if entry.module_points > 0 {
            household::add_points(conn, id, PointSource::Modules, entry.module_points)
                .context("seed module points")?;
        }
        if entry.community_points > 0 {
            household::add_points(conn, id, PointSource::Community, entry.community_points)
                .context("seed community points")?;
        }

        for (post_index, caption) in entry.post_captions.iter().enumerate() {
            let created = post::create(
                conn,
                &NewPost {
                    household_id: id.to_string(),
                    caption: caption.clone(),
                    image_ref: None,
                },
            )
            .with_context(|| format!("seed post for '{id}'"))?;
            summary.posts += 1;

            // Flag the first post of every seventh household for the
            // moderation demo queue.
            if index % 7 == 0
                && post_index == 0
                && reportable_posts.len() < fixture.report_reasons.len()
            {
                reportable_posts.push(created.post_id);
            }
        }
    }

    for (post_id, reason) in reportable_posts.iter().zip(&fixture.report_reasons) {
        report::file(conn, Some(post_id), "hh-moderation-demo", reason)
            .context("seed report")?;
        summary.reports += 1;
    }

    conn.execute(
        "UPDATE engine_meta SET seeded_at_us = ?1 WHERE id = 1",
        [chrono_now_us()],
    )
    .context("stamp seed time")?;

    tracing::info!(
        households = summary.households,
        posts = summary.posts,
        reports = summary.reports,
        "fixture seeded"
    );

    Ok(summary)
}

fn chrono_now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

#[cfg(test)]
mod tests {
    use super::seed_database;
    use crate::fixture::Fixture;
    use handa_core::db::open_in_memory;
    use handa_core::store::catalog;

    #[test]
    fn seeding_applies_every_fixture_entity() {
        let mut conn = open_in_memory().expect("open db");
        let fixture = Fixture::generate(42, 20);

        let summary = seed_database(&mut conn, &fixture).expect("seed");

        assert_eq!(summary.catalog_items, fixture.catalog.len());
        assert_eq!(summary.households, 20);
        assert_eq!(
            summary.posts,
            fixture
                .households
                .iter()
                .map(|h| h.post_captions.len())
                .sum::<usize>()
        );
        assert_eq!(catalog::size(&conn).expect("size"), fixture.catalog.len());
    }

    #[test]
    fn reseeding_the_same_fixture_collides_on_households() {
        let mut conn = open_in_memory().expect("open db");
        let fixture = Fixture::generate(42, 5);

        seed_database(&mut conn, &fixture).expect("first seed");
        assert!(seed_database(&mut conn, &fixture).is_err());
    }
}
