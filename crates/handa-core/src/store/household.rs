//! Household registry: identity, locality scope, and running point totals.

use super::{now_us, with_write_retry};
use crate::error::EngineError;
use crate::model::household::{Household, NewHousehold, PointSource, PointTotals};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

const HOUSEHOLD_COLUMNS: &str = "household_id, display_name, city_code, barangay_code, \
     points_gobag, points_modules, points_community, profile_image, \
     created_at_us, updated_at_us";

/// Register a new household.
///
/// # Errors
///
/// `DuplicateHousehold` when the id is already taken; `Storage` on database
/// failure.
pub fn register(conn: &Connection, new: &NewHousehold) -> Result<Household, EngineError> {
    let now = now_us();

    with_write_retry(|| {
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO households (
                household_id, display_name, city_code, barangay_code,
                profile_image, created_at_us, updated_at_us
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                new.household_id,
                new.display_name,
                new.city_code,
                new.barangay_code,
                new.profile_image,
                now
            ],
        )?;

        if inserted == 0 {
            return Err(EngineError::DuplicateHousehold(new.household_id.clone()));
        }
        Ok(())
    })?;

    get(conn, &new.household_id)
}

/// Fetch a household by exact id.
///
/// # Errors
///
/// `HouseholdNotFound` when absent; `Storage` on database failure.
pub fn get(conn: &Connection, household_id: &str) -> Result<Household, EngineError> {
    try_get(conn, household_id)?
        .ok_or_else(|| EngineError::HouseholdNotFound(household_id.to_string()))
}

/// Fetch a household by exact id, `None` when absent.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn try_get(conn: &Connection, household_id: &str) -> Result<Option<Household>, EngineError> {
    let sql = format!("SELECT {HOUSEHOLD_COLUMNS} FROM households WHERE household_id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    match stmt.query_row(params![household_id], row_to_household) {
        Ok(household) => Ok(Some(household)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Check whether a household exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn exists(conn: &Connection, household_id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM households WHERE household_id = ?1)",
        params![household_id],
        |row| row.get(0),
    )
}

/// List every household in a barangay, id ascending. Read path for the
/// leaderboard and analytics engines.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_by_barangay(conn: &Connection, barangay_code: &str) -> Result<Vec<Household>> {
    let sql = format!(
        "SELECT {HOUSEHOLD_COLUMNS} FROM households \
         WHERE barangay_code = ?1 ORDER BY household_id ASC"
    );
    let mut stmt = conn.prepare(&sql).context("prepare list_by_barangay")?;

    let rows = stmt
        .query_map(params![barangay_code], row_to_household)
        .context("execute list_by_barangay")?;

    let mut households = Vec::new();
    for row in rows {
        households.push(row.context("read household row")?);
    }
    Ok(households)
}

/// Atomically add `delta` points to one point source. In-place increment,
/// so concurrent awards from different request handlers never lose updates.
///
/// # Errors
///
/// `HouseholdNotFound` when no row matches; `Storage` on database failure.
pub fn add_points(
    conn: &Connection,
    household_id: &str,
    source: PointSource,
    delta: i64,
) -> Result<(), EngineError> {
    let column = source.column();
    let sql = format!(
        "UPDATE households SET {column} = {column} + ?1, updated_at_us = ?2 \
         WHERE household_id = ?3"
    );

    with_write_retry(|| {
        let updated = conn.execute(&sql, params![delta, now_us(), household_id])?;
        if updated == 0 {
            return Err(EngineError::HouseholdNotFound(household_id.to_string()));
        }
        Ok(())
    })
}

/// Update display name and/or profile image. `None` leaves a field as-is.
///
/// # Errors
///
/// `HouseholdNotFound` when no row matches; `Storage` on database failure.
pub fn update_profile(
    conn: &Connection,
    household_id: &str,
    display_name: Option<&str>,
    profile_image: Option<&str>,
) -> Result<(), EngineError> {
    with_write_retry(|| {
        let updated = conn.execute(
            "UPDATE households SET
                display_name = COALESCE(?1, display_name),
                profile_image = COALESCE(?2, profile_image),
                updated_at_us = ?3
             WHERE household_id = ?4",
            params![display_name, profile_image, now_us(), household_id],
        )?;

        if updated == 0 {
            return Err(EngineError::HouseholdNotFound(household_id.to_string()));
        }
        Ok(())
    })
}

fn row_to_household(row: &rusqlite::Row<'_>) -> rusqlite::Result<Household> {
    Ok(Household {
        household_id: row.get(0)?,
        display_name: row.get(1)?,
        city_code: row.get(2)?,
        barangay_code: row.get(3)?,
        points: PointTotals {
            go_bag: row.get(4)?,
            modules: row.get(5)?,
            community: row.get(6)?,
        },
        profile_image: row.get(7)?,
        created_at_us: row.get(8)?,
        updated_at_us: row.get(9)?,
    })
}
