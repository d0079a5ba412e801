//! Go-bag store: the per-household mutable item set.
//!
//! Every mutation is an atomic storage-level operation: `INSERT OR IGNORE`
//! for set-union, `DELETE` for set-difference, a single transaction for the
//! full replace. Concurrent edits from two sessions interleave without
//! lost updates. Item-id membership in the catalog is the caller's
//! responsibility.

use super::{household, now_us, with_write_retry};
use crate::error::EngineError;
use crate::model::gobag::GoBag;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

/// Return the household's bag, creating an empty one on first access.
/// Idempotent under concurrent first access: both creators resolve to the
/// same single row.
///
/// # Errors
///
/// `HouseholdNotFound` when the household is not registered; `Storage` on
/// database failure.
pub fn get_or_create(conn: &Connection, household_id: &str) -> Result<GoBag, EngineError> {
    ensure_household(conn, household_id)?;

    with_write_retry(|| {
        conn.execute(
            "INSERT OR IGNORE INTO go_bags (household_id, image_ref, updated_at_us)
             VALUES (?1, NULL, ?2)",
            params![household_id, now_us()],
        )?;
        Ok(())
    })?;

    get(conn, household_id)?.ok_or_else(|| {
        // The upsert above guarantees the row; reaching here means the bag
        // vanished between statements.
        EngineError::WriteConflict("go-bag disappeared after upsert")
    })
}

/// Fetch a bag with its sorted item set, `None` when the household has
/// never touched its bag.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get(conn: &Connection, household_id: &str) -> Result<Option<GoBag>, EngineError> {
    let bag_row = conn
        .query_row(
            "SELECT image_ref, updated_at_us FROM go_bags WHERE household_id = ?1",
            params![household_id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, i64>(1)?,
                ))
            },
        )
        .optional()?;

    let Some((image_ref, updated_at_us)) = bag_row else {
        return Ok(None);
    };

    Ok(Some(GoBag {
        household_id: household_id.to_string(),
        items: items_inner(conn, household_id)?,
        image_ref,
        updated_at_us,
    }))
}

/// Atomic set-union: add one item to the bag, creating the bag lazily.
/// Re-adding a held item is a no-op; no prior read is required.
///
/// # Errors
///
/// `HouseholdNotFound` when the household is not registered; `Storage` on
/// database failure.
pub fn add_item(
    conn: &mut Connection,
    household_id: &str,
    item_id: &str,
) -> Result<(), EngineError> {
    ensure_household(conn, household_id)?;

    with_write_retry(|| {
        let now = now_us();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO go_bags (household_id, image_ref, updated_at_us)
             VALUES (?1, NULL, ?2)",
            params![household_id, now],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO go_bag_items (household_id, item_id, added_at_us)
             VALUES (?1, ?2, ?3)",
            params![household_id, item_id, now],
        )?;
        tx.execute(
            "UPDATE go_bags SET updated_at_us = ?2 WHERE household_id = ?1",
            params![household_id, now],
        )?;
        tx.commit()?;
        Ok(())
    })
}

/// Atomic set-difference: drop one item from the bag. Removing an item the
/// bag does not hold is a no-op.
///
/// # Errors
///
/// `HouseholdNotFound` when the household is not registered; `Storage` on
/// database failure.
pub fn remove_item(
    conn: &mut Connection,
    household_id: &str,
    item_id: &str,
) -> Result<(), EngineError> {
    ensure_household(conn, household_id)?;

    with_write_retry(|| {
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM go_bag_items WHERE household_id = ?1 AND item_id = ?2",
            params![household_id, item_id],
        )?;
        tx.execute(
            "UPDATE go_bags SET updated_at_us = ?2 WHERE household_id = ?1",
            params![household_id, now_us()],
        )?;
        tx.commit()?;
        Ok(())
    })
}

/// Atomic full replace of the item set and image reference, used by the
/// update-checklist workflow which submits a complete new state. Duplicate
/// ids in the input collapse through the set invariant.
///
/// # Errors
///
/// `HouseholdNotFound` when the household is not registered; `Storage` on
/// database failure.
pub fn replace_all(
    conn: &mut Connection,
    household_id: &str,
    item_ids: &[String],
    image_ref: Option<&str>,
) -> Result<(), EngineError> {
    ensure_household(conn, household_id)?;

    with_write_retry(|| {
        let now = now_us();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO go_bags (household_id, image_ref, updated_at_us)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(household_id) DO UPDATE SET
                image_ref = excluded.image_ref,
                updated_at_us = excluded.updated_at_us",
            params![household_id, image_ref, now],
        )?;
        tx.execute(
            "DELETE FROM go_bag_items WHERE household_id = ?1",
            params![household_id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO go_bag_items (household_id, item_id, added_at_us)
                 VALUES (?1, ?2, ?3)",
            )?;
            for item_id in item_ids {
                stmt.execute(params![household_id, item_id, now])?;
            }
        }

        tx.commit()?;
        Ok(())
    })
}

/// Projection-only read of the bag's image reference. `None` when the bag
/// does not exist or no image was ever uploaded.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_image(conn: &Connection, household_id: &str) -> Result<Option<String>> {
    let image: Option<Option<String>> = conn
        .query_row(
            "SELECT image_ref FROM go_bags WHERE household_id = ?1",
            params![household_id],
            |row| row.get(0),
        )
        .optional()
        .context("read go-bag image")?;

    Ok(image.flatten())
}

/// Held item ids, sorted ascending.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn items(conn: &Connection, household_id: &str) -> Result<Vec<String>> {
    items_inner(conn, household_id).context("read bag items")
}

fn items_inner(conn: &Connection, household_id: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT item_id FROM go_bag_items WHERE household_id = ?1 ORDER BY item_id ASC")?;
    stmt.query_map(params![household_id], |row| row.get::<_, String>(0))?
        .collect()
}

/// Number of held items, the numerator for completeness scoring.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn item_count(conn: &Connection, household_id: &str) -> Result<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM go_bag_items WHERE household_id = ?1",
            params![household_id],
            |row| row.get(0),
        )
        .context("count bag items")?;
    Ok(usize::try_from(count).unwrap_or(0))
}

fn ensure_household(conn: &Connection, household_id: &str) -> Result<(), EngineError> {
    if household::exists(conn, household_id)? {
        Ok(())
    } else {
        Err(EngineError::HouseholdNotFound(household_id.to_string()))
    }
}
