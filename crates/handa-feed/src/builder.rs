//! Feed assembly: one SQL join feeds the pure pipeline stages.
//!
//! The builder fetches posts joined with household identity (the barangay
//! filter is pushed into SQL since it lives on the post row and needs no join),
//! attaches snapshots and completeness, then applies the stages in the
//! order documented in [`crate::stage`].

use crate::query::FeedQuery;
use crate::stage;
use anyhow::{Context, Result};
use handa_core::model::post::{Post, SnapshotItem};
use handa_core::score::completeness;
use handa_core::store::catalog;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One feed row: the post plus the joined household identity and the
/// completeness score of the snapshotted bag against the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub display_name: String,
    pub city_code: String,
    pub completeness: u8,
}

/// A feed page plus the total row count of the filtered (and, in unique
/// mode, deduplicated) set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResult {
    pub data: Vec<FeedPost>,
    pub total: usize,
}

/// Build one feed page for `query`.
///
/// Pure read over a point-in-time snapshot of storage: no locking, no
/// internal retries; a storage failure propagates immediately.
///
/// # Errors
///
/// Returns an error if any database query fails.
pub fn build_feed(conn: &Connection, query: &FeedQuery) -> Result<FeedResult> {
    let catalog_size = catalog::size(conn).context("read catalog size for feed scoring")?;

    let mut rows = fetch_rows(conn, query.barangay.as_deref(), catalog_size)
        .context("fetch feed rows")?;

    tracing::debug!(
        fetched = rows.len(),
        unique = query.unique_per_household,
        "feed rows fetched"
    );

    if query.unique_per_household {
        rows = stage::dedupe_latest_per_household(rows);
    }
    if let Some(city) = query.city.as_deref() {
        rows = stage::filter_city(rows, city);
    }
    if let Some(search) = query.search.as_deref() {
        rows = stage::filter_search(rows, search);
    }

    stage::sort_rows(&mut rows, query.sort, query.order);
    let (data, total) = stage::paginate(rows, query.page);

    Ok(FeedResult { data, total })
}

fn fetch_rows(
    conn: &Connection,
    barangay: Option<&str>,
    catalog_size: usize,
) -> Result<Vec<FeedPost>> {
    let mut snapshots = fetch_snapshots(conn, barangay)?;

    let barangay_clause = if barangay.is_some() {
        " WHERE p.barangay_code = ?1"
    } else {
        ""
    };

    let sql = format!(
        "SELECT p.post_id, p.household_id, p.caption, p.image_ref, p.barangay_code,
                p.verified_item_count, p.verification_count, p.created_at_us,
                h.display_name, h.city_code
         FROM posts p
         INNER JOIN households h ON h.household_id = p.household_id{barangay_clause}"
    );

    let mut stmt = conn.prepare(&sql).context("prepare feed join")?;

    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(Post, String, String)> {
        Ok((
            Post {
                post_id: row.get(0)?,
                household_id: row.get(1)?,
                caption: row.get(2)?,
                image_ref: row.get(3)?,
                barangay_code: row.get(4)?,
                bag_snapshot: Vec::new(),
                verified_item_count: row.get(5)?,
                verification_count: row.get(6)?,
                created_at_us: row.get(7)?,
            },
            row.get(8)?,
            row.get(9)?,
        ))
    };

    let raw_rows = if let Some(barangay) = barangay {
        stmt.query_map(params![barangay], map_row)
    } else {
        stmt.query_map([], map_row)
    }
    .context("execute feed join")?;

    let mut rows = Vec::new();
    for raw in raw_rows {
        let (mut post, display_name, city_code) = raw.context("read feed row")?;
        post.bag_snapshot = snapshots.remove(&post.post_id).unwrap_or_default();
        let score = completeness(post.bag_snapshot.len(), catalog_size);
        rows.push(FeedPost {
            post,
            display_name,
            city_code,
            completeness: score,
        });
    }

    Ok(rows)
}

fn fetch_snapshots(
    conn: &Connection,
    barangay: Option<&str>,
) -> Result<HashMap<String, Vec<SnapshotItem>>> {
    let barangay_clause = if barangay.is_some() {
        " WHERE p.barangay_code = ?1"
    } else {
        ""
    };

    let sql = format!(
        "SELECT s.post_id, s.item_id, s.name, s.category
         FROM post_snapshot_items s
         INNER JOIN posts p ON p.post_id = s.post_id{barangay_clause}
         ORDER BY s.post_id ASC, s.position ASC"
    );

    let mut stmt = conn.prepare(&sql).context("prepare snapshot fetch")?;

    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(String, SnapshotItem)> {
        Ok((
            row.get(0)?,
            SnapshotItem {
                item_id: row.get(1)?,
                name: row.get(2)?,
                category: row.get(3)?,
            },
        ))
    };

    let raw_rows = if let Some(barangay) = barangay {
        stmt.query_map(params![barangay], map_row)
    } else {
        stmt.query_map([], map_row)
    }
    .context("execute snapshot fetch")?;

    let mut snapshots: HashMap<String, Vec<SnapshotItem>> = HashMap::new();
    for raw in raw_rows {
        let (post_id, item) = raw.context("read snapshot row")?;
        snapshots.entry(post_id).or_default().push(item);
    }

    Ok(snapshots)
}
