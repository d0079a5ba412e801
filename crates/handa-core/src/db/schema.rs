//! Canonical SQLite schema for the handa engine.
//!
//! The schema is normalized for queryability:
//! - `households` keeps identity, locality scope, and running point totals
//! - `catalog_items` is read-only reference data loaded from a catalog file
//! - `go_bags` / `go_bag_items` model the per-household item set; the
//!   composite primary key on `go_bag_items` is the set invariant
//! - `posts` / `post_snapshot_items` keep the append-only archive with each
//!   post's immutable bag snapshot
//! - `content_reports` drives the moderation state machine
//! - `engine_meta` tracks schema bookkeeping

/// Migration v1: core normalized tables plus engine metadata.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS households (
    household_id TEXT PRIMARY KEY CHECK (length(trim(household_id)) > 0),
    display_name TEXT NOT NULL,
    city_code TEXT NOT NULL CHECK (length(trim(city_code)) > 0),
    barangay_code TEXT NOT NULL CHECK (length(trim(barangay_code)) > 0),
    points_gobag INTEGER NOT NULL DEFAULT 0 CHECK (points_gobag >= 0),
    points_modules INTEGER NOT NULL DEFAULT 0 CHECK (points_modules >= 0),
    points_community INTEGER NOT NULL DEFAULT 0 CHECK (points_community >= 0),
    profile_image TEXT,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS catalog_items (
    item_id TEXT PRIMARY KEY CHECK (length(trim(item_id)) > 0),
    name TEXT NOT NULL,
    category TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS go_bags (
    household_id TEXT PRIMARY KEY REFERENCES households(household_id) ON DELETE CASCADE,
    image_ref TEXT,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS go_bag_items (
    household_id TEXT NOT NULL REFERENCES go_bags(household_id) ON DELETE CASCADE,
    item_id TEXT NOT NULL CHECK (length(trim(item_id)) > 0),
    added_at_us INTEGER NOT NULL,
    PRIMARY KEY (household_id, item_id)
);

CREATE TABLE IF NOT EXISTS posts (
    post_id TEXT PRIMARY KEY CHECK (post_id LIKE 'ps-%'),
    household_id TEXT NOT NULL REFERENCES households(household_id) ON DELETE CASCADE,
    caption TEXT NOT NULL,
    image_ref TEXT,
    barangay_code TEXT NOT NULL,
    verified_item_count INTEGER NOT NULL DEFAULT 0 CHECK (verified_item_count >= 0),
    verification_count INTEGER NOT NULL DEFAULT 0 CHECK (verification_count >= 0),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS post_snapshot_items (
    post_id TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    position INTEGER NOT NULL CHECK (position >= 0),
    item_id TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    PRIMARY KEY (post_id, position)
);

CREATE TABLE IF NOT EXISTS content_reports (
    report_id TEXT PRIMARY KEY CHECK (report_id LIKE 'rp-%'),
    post_id TEXT,
    reporter_id TEXT NOT NULL,
    reason TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'resolved', 'dismissed')),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS engine_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    seeded_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO engine_meta (id, schema_version, seeded_at_us)
VALUES (1, 1, 0);
"#;

/// Migration v2: read-path indexes for feed, leaderboard, and analytics.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_posts_barangay_created
    ON posts(barangay_code, created_at_us DESC);

CREATE INDEX IF NOT EXISTS idx_posts_household_created
    ON posts(household_id, created_at_us DESC);

CREATE INDEX IF NOT EXISTS idx_households_barangay
    ON households(barangay_code, household_id);

CREATE INDEX IF NOT EXISTS idx_go_bag_items_item
    ON go_bag_items(item_id, household_id);

CREATE INDEX IF NOT EXISTS idx_content_reports_status_created
    ON content_reports(status, created_at_us DESC);

UPDATE engine_meta
SET schema_version = 2
WHERE id = 1;
"#;

/// Indexes expected by feed/leaderboard/analytics query paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_posts_barangay_created",
    "idx_posts_household_created",
    "idx_households_barangay",
    "idx_go_bag_items_item",
    "idx_content_reports_status_created",
];

#[cfg(test)]
mod tests {
    use crate::db::migrations;
    use rusqlite::{Connection, params};

    fn seeded_conn() -> rusqlite::Result<Connection> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::migrate(&mut conn)?;

        for idx in 0..24_u32 {
            let household_id = format!("hh-{idx:03}");
            let barangay = if idx % 2 == 0 { "qc-commonwealth" } else { "qc-batasan" };

            conn.execute(
                "INSERT INTO households (
                    household_id,
                    display_name,
                    city_code,
                    barangay_code,
                    points_gobag,
                    created_at_us,
                    updated_at_us
                 ) VALUES (?1, ?2, 'quezon-city', ?3, ?4, ?5, ?5)",
                params![
                    household_id,
                    format!("Household {idx}"),
                    barangay,
                    i64::from(idx) * 10,
                    i64::from(idx)
                ],
            )?;

            conn.execute(
                "INSERT INTO posts (
                    post_id,
                    household_id,
                    caption,
                    barangay_code,
                    created_at_us
                 ) VALUES (?1, ?2, 'Bag update', ?3, ?4)",
                params![
                    format!("ps-{idx:03}"),
                    format!("hh-{idx:03}"),
                    barangay,
                    i64::from(idx) * 100
                ],
            )?;
        }

        Ok(conn)
    }

    fn query_plan_details(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare(&format!("EXPLAIN QUERY PLAN {sql}"))?;
        stmt.query_map([], |row| row.get::<_, String>(3))?
            .collect::<Result<Vec<_>, _>>()
    }

    #[test]
    fn query_plan_uses_feed_index() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let details = query_plan_details(
            &conn,
            "SELECT post_id
             FROM posts
             WHERE barangay_code = 'qc-batasan'
             ORDER BY created_at_us DESC
             LIMIT 20",
        )?;

        assert!(
            details
                .iter()
                .any(|detail| detail.contains("idx_posts_barangay_created")),
            "expected feed index in plan, got: {details:?}"
        );

        Ok(())
    }

    #[test]
    fn query_plan_uses_locality_index_for_leaderboards() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        let details = query_plan_details(
            &conn,
            "SELECT household_id
             FROM households
             WHERE barangay_code = 'qc-commonwealth'
             ORDER BY household_id",
        )?;

        assert!(
            details
                .iter()
                .any(|detail| detail.contains("idx_households_barangay")),
            "expected locality index in plan, got: {details:?}"
        );

        Ok(())
    }

    #[test]
    fn duplicate_bag_items_are_rejected_by_primary_key() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        conn.execute(
            "INSERT INTO go_bags (household_id, updated_at_us) VALUES ('hh-000', 1)",
            [],
        )?;
        conn.execute(
            "INSERT INTO go_bag_items (household_id, item_id, added_at_us)
             VALUES ('hh-000', 'water', 1)",
            [],
        )?;

        let dup = conn.execute(
            "INSERT INTO go_bag_items (household_id, item_id, added_at_us)
             VALUES ('hh-000', 'water', 2)",
            [],
        );
        assert!(dup.is_err(), "set invariant must reject duplicate item");

        Ok(())
    }

    #[test]
    fn deleting_a_post_cascades_to_snapshot_rows() -> rusqlite::Result<()> {
        let conn = seeded_conn()?;
        conn.execute(
            "INSERT INTO post_snapshot_items (post_id, position, item_id, name, category)
             VALUES ('ps-000', 0, 'water', 'Drinking water', 'Food & Water')",
            [],
        )?;

        conn.execute("DELETE FROM posts WHERE post_id = 'ps-000'", [])?;

        let remaining: i64 = conn.query_row(
            "SELECT COUNT(*) FROM post_snapshot_items WHERE post_id = 'ps-000'",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(remaining, 0);

        Ok(())
    }
}
