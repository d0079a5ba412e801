//! Catalog registry: the fixed set of canonical checklist items.
//!
//! Reference data only. It is loaded explicitly from a TOML catalog file;
//! production code paths never bake items in. The store performs no
//! membership validation on go-bag writes; callers validate item ids against
//! this registry before mutating bags.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::model::catalog::{CatalogFile, CatalogItem};

/// Load catalog items from a TOML file (`[[item]]` tables) and insert any
/// that are not yet present. Returns the number of newly inserted items.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or on database
/// failure.
pub fn load_from_path(conn: &Connection, path: &std::path::Path) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog file {}", path.display()))?;
    let parsed: CatalogFile = toml::from_str(&content)
        .with_context(|| format!("parse catalog file {}", path.display()))?;

    insert_items(conn, &parsed.item)
}

/// Insert catalog items, ignoring ids already present. Returns the number
/// of newly inserted items.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn insert_items(conn: &Connection, items: &[CatalogItem]) -> Result<usize> {
    let mut stmt = conn
        .prepare("INSERT OR IGNORE INTO catalog_items (item_id, name, category) VALUES (?1, ?2, ?3)")
        .context("prepare catalog insert")?;

    let mut inserted = 0;
    for item in items {
        inserted += stmt
            .execute(params![item.item_id, item.name, item.category])
            .with_context(|| format!("insert catalog item '{}'", item.item_id))?;
    }

    tracing::debug!(inserted, total = items.len(), "catalog items loaded");
    Ok(inserted)
}

/// List the full catalog, item id ascending.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list(conn: &Connection) -> Result<Vec<CatalogItem>> {
    let mut stmt = conn
        .prepare("SELECT item_id, name, category FROM catalog_items ORDER BY item_id ASC")
        .context("prepare catalog list")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(CatalogItem {
                item_id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
            })
        })
        .context("execute catalog list")?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.context("read catalog row")?);
    }
    Ok(items)
}

/// Total catalog size, the denominator for completeness scoring.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn size(conn: &Connection) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM catalog_items", [], |row| row.get(0))
        .context("count catalog items")?;
    Ok(usize::try_from(count).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn item(id: &str, name: &str, category: &str) -> CatalogItem {
        CatalogItem {
            item_id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn insert_is_idempotent_per_item_id() {
        let conn = open_in_memory().expect("open db");
        let items = vec![
            item("water", "Drinking water (3 days)", "Food & Water"),
            item("flashlight", "Flashlight", "Tools"),
        ];

        assert_eq!(insert_items(&conn, &items).expect("first load"), 2);
        assert_eq!(insert_items(&conn, &items).expect("second load"), 0);
        assert_eq!(size(&conn).expect("size"), 2);
    }

    #[test]
    fn list_returns_items_ordered_by_id() {
        let conn = open_in_memory().expect("open db");
        insert_items(
            &conn,
            &[
                item("whistle", "Whistle", "Tools"),
                item("bandages", "Bandages", "First Aid"),
            ],
        )
        .expect("load");

        let listed = list(&conn).expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].item_id, "bandages");
        assert_eq!(listed[1].item_id, "whistle");
    }

    #[test]
    fn load_from_path_parses_toml_catalog() {
        let conn = open_in_memory().expect("open db");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
            [[item]]
            itemId = "radio"
            name = "Battery radio"
            category = "Tools"
            "#,
        )
        .expect("write catalog");

        assert_eq!(load_from_path(&conn, &path).expect("load"), 1);
        assert_eq!(size(&conn).expect("size"), 1);
    }

    #[test]
    fn load_from_missing_path_is_an_error() {
        let conn = open_in_memory().expect("open db");
        let missing = std::path::Path::new("/nonexistent/catalog.toml");
        assert!(load_from_path(&conn, missing).is_err());
    }
}
