//! `handa report`: file and resolve moderation reports.
//!
//! Conflict outcomes (a report already handled by another moderator) render
//! as a refresh hint rather than a raw error, per the engine's error
//! taxonomy.

use crate::output::{OutputMode, render_json, render_success};
use anyhow::bail;
use clap::Subcommand;
use handa_core::db::open_db;
use handa_core::error::{EngineError, ErrorKind};
use handa_core::model::report::ReportStatus;
use handa_core::store::report;
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// File a report against a post.
    File {
        /// The flagged post id (omit when the post is already gone).
        post_id: Option<String>,
        /// Household filing the report.
        #[arg(long)]
        reporter: String,
        /// Why the post was flagged.
        #[arg(long)]
        reason: String,
    },
    /// Resolve a pending report, deleting the flagged post.
    Resolve { report_id: String },
    /// Dismiss a pending report, keeping the post.
    Dismiss { report_id: String },
    /// List reports, newest first.
    List {
        /// Filter by status: pending, resolved, dismissed.
        #[arg(long)]
        status: Option<String>,
    },
}

pub fn run_report(
    command: &ReportCommand,
    db_path: &Path,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut conn = open_db(db_path)?;

    match command {
        ReportCommand::File {
            post_id,
            reporter,
            reason,
        } => {
            let filed = report::file(&conn, post_id.as_deref(), reporter, reason)?;
            if output.is_json() {
                return render_json(&filed);
            }
            render_success(output, &format!("Filed report '{}'", filed.report_id))
        }
        ReportCommand::Resolve { report_id } => {
            transition(&mut conn, report_id, ReportStatus::Resolved, output)
        }
        ReportCommand::Dismiss { report_id } => {
            transition(&mut conn, report_id, ReportStatus::Dismissed, output)
        }
        ReportCommand::List { status } => {
            let status = status
                .as_deref()
                .map(ReportStatus::from_str)
                .transpose()?;
            let reports = report::list(&conn, status, None, None)?;

            if output.is_json() {
                return render_json(&reports);
            }
            for row in &reports {
                println!(
                    "{}  {:<9}  {:<24}  {}",
                    row.report_id,
                    row.status.to_string(),
                    row.post_id.as_deref().unwrap_or("(post gone)"),
                    row.reason
                );
            }
            if reports.is_empty() {
                println!("No reports found.");
            }
            Ok(())
        }
    }
}

fn transition(
    conn: &mut rusqlite::Connection,
    report_id: &str,
    target: ReportStatus,
    output: OutputMode,
) -> anyhow::Result<()> {
    match report::transition(conn, report_id, target) {
        Ok(updated) => render_success(
            output,
            &format!("Report '{}' is now {}", updated.report_id, updated.status),
        ),
        Err(error) if error.kind() == ErrorKind::Conflict => {
            bail!("already handled, please refresh ({})", error.code())
        }
        Err(error @ EngineError::ReportNotFound(_)) => {
            bail!("{error}. {}", error.code().hint().unwrap_or_default())
        }
        Err(error) => Err(error.into()),
    }
}
