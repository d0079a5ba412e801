//! `handa top`: barangay leaderboard.

use crate::output::{OutputMode, pretty_rule, render_json};
use anyhow::Context;
use clap::Args;
use handa_core::config::EngineConfig;
use handa_core::db::open_db;
use handa_core::page::Page;
use handa_rank::{LeaderboardQuery, Metric, build_leaderboard};
use std::io::stdout;
use std::path::Path;
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct TopArgs {
    /// Barangay code (leaderboards are always locality-scoped).
    #[arg(long)]
    pub barangay: String,

    /// Ranking metric: all-time or go-bag.
    #[arg(long, default_value = "all-time")]
    pub metric: String,

    /// Case-insensitive search on display names. Narrows rows, never
    /// rank numbers.
    #[arg(short, long)]
    pub search: Option<String>,

    /// 1-based page number.
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Rows per page (capped by the configured maximum).
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

pub fn run_top(
    args: &TopArgs,
    db_path: &Path,
    config: &EngineConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let conn = open_db(db_path)?;

    let limit = args
        .limit
        .unwrap_or(config.leaderboard.default_limit)
        .min(config.leaderboard.max_limit);

    let mut query = LeaderboardQuery::new(
        args.barangay.clone(),
        Metric::from_str(&args.metric).context("parse --metric")?,
    )?;
    query.search = args.search.clone();
    query.page = Page::new(args.page, limit)?;

    let result = build_leaderboard(&conn, &query)?;

    if output.is_json() {
        return render_json(&result);
    }

    let mut w = stdout();
    for row in &result.data {
        println!(
            "{:>4}. {:<28} {:>8} pts",
            row.rank, row.display_name, row.metric_value
        );
    }
    pretty_rule(&mut w)?;
    println!(
        "{} household(s) on the {} board of {}",
        result.total, query.metric, query.barangay
    );
    Ok(())
}
