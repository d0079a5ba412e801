//! Post archive: append-only community posts with immutable bag snapshots.
//!
//! A post captures the household's bag at creation time by copying item
//! rows (with their catalog name/category) into `post_snapshot_items`.
//! Later bag or catalog edits never touch past posts; only the
//! verification counters move, and moderation may delete the row.

use super::{now_us, with_write_retry};
use crate::error::EngineError;
use crate::model::post::{NewPost, Post, SnapshotItem};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use uuid::Uuid;

/// Create a post, snapshotting the household's current bag.
///
/// # Errors
///
/// `HouseholdNotFound` when the household is not registered; `Storage` on
/// database failure.
pub fn create(conn: &mut Connection, new: &NewPost) -> Result<Post, EngineError> {
    let post_id = format!("ps-{}", Uuid::new_v4());

    with_write_retry(|| {
        let now = now_us();
        let tx = conn.transaction()?;

        let barangay: Option<String> = tx
            .query_row(
                "SELECT barangay_code FROM households WHERE household_id = ?1",
                params![new.household_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(barangay_code) = barangay else {
            return Err(EngineError::HouseholdNotFound(new.household_id.clone()));
        };

        tx.execute(
            "INSERT INTO posts (
                post_id, household_id, caption, image_ref, barangay_code,
                verified_item_count, verification_count, created_at_us
             ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6)",
            params![
                post_id,
                new.household_id,
                new.caption,
                new.image_ref,
                barangay_code,
                now
            ],
        )?;

        // Snapshot the live bag ordered by item id; items missing from the
        // catalog keep their id as the display name.
        tx.execute(
            "INSERT INTO post_snapshot_items (post_id, position, item_id, name, category)
             SELECT
                ?1,
                ROW_NUMBER() OVER (ORDER BY gi.item_id ASC) - 1,
                gi.item_id,
                COALESCE(ci.name, gi.item_id),
                COALESCE(ci.category, 'uncategorized')
             FROM go_bag_items gi
             LEFT JOIN catalog_items ci ON ci.item_id = gi.item_id
             WHERE gi.household_id = ?2",
            params![post_id, new.household_id],
        )?;

        tx.commit()?;
        Ok(())
    })?;

    get(conn, &post_id)
}

/// Fetch a post with its ordered snapshot.
///
/// # Errors
///
/// `PostNotFound` when absent; `Storage` on database failure.
pub fn get(conn: &Connection, post_id: &str) -> Result<Post, EngineError> {
    let header = conn
        .query_row(
            "SELECT post_id, household_id, caption, image_ref, barangay_code,
                    verified_item_count, verification_count, created_at_us
             FROM posts WHERE post_id = ?1",
            params![post_id],
            row_to_post_header,
        )
        .optional()?;

    let Some(mut post) = header else {
        return Err(EngineError::PostNotFound(post_id.to_string()));
    };

    post.bag_snapshot = snapshot_items(conn, post_id)?;
    Ok(post)
}

/// Record one verification pass over a post's snapshot as a single atomic
/// update: the pass counter increments and the highest verified-item claim
/// seen wins, so concurrent verifiers compose order-independently.
///
/// # Errors
///
/// `PostNotFound` when no row matches; `Storage` on database failure.
pub fn record_verification(
    conn: &Connection,
    post_id: &str,
    verified_items: u32,
) -> Result<(), EngineError> {
    with_write_retry(|| {
        let updated = conn.execute(
            "UPDATE posts SET
                verification_count = verification_count + 1,
                verified_item_count = MAX(verified_item_count, ?1)
             WHERE post_id = ?2",
            params![verified_items, post_id],
        )?;

        if updated == 0 {
            return Err(EngineError::PostNotFound(post_id.to_string()));
        }
        Ok(())
    })
}

/// Delete a post; snapshot rows cascade.
///
/// # Errors
///
/// `PostNotFound` when no row matches; `Storage` on database failure.
pub fn delete(conn: &Connection, post_id: &str) -> Result<(), EngineError> {
    with_write_retry(|| {
        let deleted = conn.execute("DELETE FROM posts WHERE post_id = ?1", params![post_id])?;
        if deleted == 0 {
            return Err(EngineError::PostNotFound(post_id.to_string()));
        }
        Ok(())
    })
}

/// Delete a post if it still exists. Used by the moderation cascade, which
/// tolerates a post already removed by another path. Returns whether a row
/// was deleted.
pub(crate) fn delete_if_present(tx: &Transaction<'_>, post_id: &str) -> rusqlite::Result<bool> {
    let deleted = tx.execute("DELETE FROM posts WHERE post_id = ?1", params![post_id])?;
    Ok(deleted > 0)
}

fn snapshot_items(conn: &Connection, post_id: &str) -> rusqlite::Result<Vec<SnapshotItem>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, name, category FROM post_snapshot_items
         WHERE post_id = ?1 ORDER BY position ASC",
    )?;
    stmt.query_map(params![post_id], |row| {
        Ok(SnapshotItem {
            item_id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
        })
    })?
    .collect()
}

fn row_to_post_header(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        post_id: row.get(0)?,
        household_id: row.get(1)?,
        caption: row.get(2)?,
        image_ref: row.get(3)?,
        barangay_code: row.get(4)?,
        bag_snapshot: Vec::new(),
        verified_item_count: row.get(5)?,
        verification_count: row.get(6)?,
        created_at_us: row.get(7)?,
    })
}
