//! Moderation report resolver.
//!
//! The state machine lives on [`ReportStatus`]; this module pins it to
//! storage with a conditional update that only succeeds while the report is
//! still pending. Two administrators racing to close the same report
//! therefore serialize on the row: the loser's update matches nothing and
//! surfaces as a conflict. Resolving deletes the flagged post in the same
//! transaction, tolerating a post already removed by another path.

use super::{now_us, post, with_write_retry};
use crate::error::EngineError;
use crate::model::report::{ContentReport, ReportStatus};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

/// File a new report against a post (or a post that may already be gone).
///
/// # Errors
///
/// `Storage` on database failure.
pub fn file(
    conn: &Connection,
    post_id: Option<&str>,
    reporter_id: &str,
    reason: &str,
) -> Result<ContentReport, EngineError> {
    let report_id = format!("rp-{}", Uuid::new_v4());

    with_write_retry(|| {
        let now = now_us();
        conn.execute(
            "INSERT INTO content_reports (
                report_id, post_id, reporter_id, reason, status,
                created_at_us, updated_at_us
             ) VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?5)",
            params![report_id, post_id, reporter_id, reason, now],
        )?;
        Ok(())
    })?;

    get(conn, &report_id)
}

/// Fetch a report by exact id.
///
/// # Errors
///
/// `ReportNotFound` when absent; `Storage` on database failure.
pub fn get(conn: &Connection, report_id: &str) -> Result<ContentReport, EngineError> {
    try_get(conn, report_id)?
        .ok_or_else(|| EngineError::ReportNotFound(report_id.to_string()))
}

fn try_get(conn: &Connection, report_id: &str) -> Result<Option<ContentReport>, EngineError> {
    let report = conn
        .query_row(
            "SELECT report_id, post_id, reporter_id, reason, status,
                    created_at_us, updated_at_us
             FROM content_reports WHERE report_id = ?1",
            params![report_id],
            row_to_report,
        )
        .optional()?;
    Ok(report)
}

/// List reports, newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list(
    conn: &Connection,
    status: Option<ReportStatus>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<ContentReport>> {
    let limit_clause = match (limit, offset) {
        (Some(limit), Some(offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
        (Some(limit), None) => format!(" LIMIT {limit}"),
        (None, Some(offset)) => format!(" LIMIT -1 OFFSET {offset}"),
        (None, None) => String::new(),
    };

    let where_clause = if status.is_some() {
        " WHERE status = ?1"
    } else {
        ""
    };

    let sql = format!(
        "SELECT report_id, post_id, reporter_id, reason, status,
                created_at_us, updated_at_us
         FROM content_reports{where_clause}
         ORDER BY created_at_us DESC, report_id ASC{limit_clause}"
    );

    let mut stmt = conn.prepare(&sql).context("prepare report list")?;

    let mut reports = Vec::new();
    let rows = if let Some(status) = status {
        stmt.query_map(params![status.to_string()], row_to_report)
    } else {
        stmt.query_map([], row_to_report)
    }
    .context("execute report list")?;

    for row in rows {
        reports.push(row.context("read report row")?);
    }
    Ok(reports)
}

/// Drive a pending report to a terminal state.
///
/// `Resolved` deletes the associated post (when it still exists) and marks
/// the report in one transaction; `Dismissed` only flips the status. The
/// status change is a conditional update guarded on `status = 'pending'`,
/// so of two concurrent administrators exactly one wins and the other
/// receives a conflict.
///
/// # Errors
///
/// `Validation` when `target` is `Pending`; `ReportNotFound` when the
/// report does not exist; `ReportAlreadyClosed` when it is already
/// terminal; `Storage` on database failure.
pub fn transition(
    conn: &mut Connection,
    report_id: &str,
    target: ReportStatus,
) -> Result<ContentReport, EngineError> {
    if target == ReportStatus::Pending {
        return Err(EngineError::Validation(
            "reports cannot return to pending".to_string(),
        ));
    }

    with_write_retry(|| {
        let tx = conn.transaction()?;

        let updated = tx.execute(
            "UPDATE content_reports SET status = ?1, updated_at_us = ?2
             WHERE report_id = ?3 AND status = 'pending'",
            params![target.to_string(), now_us(), report_id],
        )?;

        if updated == 0 {
            let current: Option<String> = tx
                .query_row(
                    "SELECT status FROM content_reports WHERE report_id = ?1",
                    params![report_id],
                    |row| row.get(0),
                )
                .optional()?;

            return match current.as_deref() {
                None => Err(EngineError::ReportNotFound(report_id.to_string())),
                Some(status) => Err(EngineError::ReportAlreadyClosed {
                    id: report_id.to_string(),
                    status: status.parse().unwrap_or(ReportStatus::Resolved),
                }),
            };
        }

        if target == ReportStatus::Resolved {
            let flagged_post: Option<Option<String>> = tx
                .query_row(
                    "SELECT post_id FROM content_reports WHERE report_id = ?1",
                    params![report_id],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(Some(post_id)) = flagged_post {
                let deleted = post::delete_if_present(&tx, &post_id)?;
                tracing::info!(report_id, post_id, deleted, "report resolved");
            }
        }

        tx.commit()?;
        Ok(())
    })?;

    get(conn, report_id)
}

fn row_to_report(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContentReport> {
    let status: String = row.get(4)?;
    Ok(ContentReport {
        report_id: row.get(0)?,
        post_id: row.get(1)?,
        reporter_id: row.get(2)?,
        reason: row.get(3)?,
        status: status.parse().unwrap_or(ReportStatus::Pending),
        created_at_us: row.get(5)?,
        updated_at_us: row.get(6)?,
    })
}
