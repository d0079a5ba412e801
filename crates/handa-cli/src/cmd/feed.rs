//! `handa feed`: browse the community feed.

use crate::output::{OutputMode, pretty_rule, render_json};
use anyhow::Context;
use clap::Args;
use handa_core::config::EngineConfig;
use handa_core::db::open_db;
use handa_core::page::Page;
use handa_feed::{FeedQuery, FeedSort, SortDir, build_feed};
use std::io::stdout;
use std::path::Path;
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// City code; combine with --barangay to scope to one neighborhood.
    #[arg(long)]
    pub city: Option<String>,

    /// Barangay code.
    #[arg(long)]
    pub barangay: Option<String>,

    /// Case-insensitive search over captions, snapshot items, and names.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort field: created, verifications, verified-items.
    #[arg(long, default_value = "created")]
    pub sort: String,

    /// Sort direction: asc or desc.
    #[arg(long, default_value = "desc")]
    pub order: String,

    /// 1-based page number.
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Rows per page (capped by the configured maximum).
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Keep only the most recent post per household.
    #[arg(long)]
    pub unique: bool,
}

pub fn run_feed(
    args: &FeedArgs,
    db_path: &Path,
    config: &EngineConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let conn = open_db(db_path)?;

    let limit = args
        .limit
        .unwrap_or(config.feed.default_limit)
        .min(config.feed.max_limit);

    let query = FeedQuery {
        city: args.city.clone(),
        barangay: args.barangay.clone(),
        search: args.search.clone(),
        sort: FeedSort::from_str(&args.sort).context("parse --sort")?,
        order: SortDir::from_str(&args.order).context("parse --order")?,
        page: Page::new(args.page, limit)?,
        unique_per_household: args.unique,
    };

    let result = build_feed(&conn, &query)?;

    if output.is_json() {
        return render_json(&result);
    }

    let mut w = stdout();
    for row in &result.data {
        println!(
            "{}  {}  [{}% ready, {} verification(s)]",
            row.display_name, row.post.caption, row.completeness, row.post.verification_count
        );
    }
    pretty_rule(&mut w)?;
    println!(
        "page {} of {} post(s) total",
        query.page.page(),
        result.total
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: FeedArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.city.is_none());
        assert_eq!(w.args.sort, "created");
        assert_eq!(w.args.order, "desc");
        assert_eq!(w.args.page, 1);
        assert!(!w.args.unique);
    }
}
