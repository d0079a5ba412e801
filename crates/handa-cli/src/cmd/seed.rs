//! `handa seed`: load a deterministic fixture through the store layer.

use crate::output::{OutputMode, pretty_kv, render_json};
use clap::Args;
use handa_core::db::open_db;
use handa_sim::{Fixture, seed_database};
use std::io::stdout;
use std::path::Path;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Fixture seed; the same seed always produces the same dataset.
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of households to generate.
    #[arg(short = 'n', long, default_value = "40")]
    pub households: usize,
}

pub fn run_seed(args: &SeedArgs, db_path: &Path, output: OutputMode) -> anyhow::Result<()> {
    let mut conn = open_db(db_path)?;
    let fixture = Fixture::generate(args.seed, args.households);
    let summary = seed_database(&mut conn, &fixture)?;

    if output.is_json() {
        return render_json(&summary);
    }

    let mut w = stdout();
    pretty_kv(&mut w, "catalog items", summary.catalog_items.to_string())?;
    pretty_kv(&mut w, "households", summary.households.to_string())?;
    pretty_kv(&mut w, "bag items", summary.bag_items.to_string())?;
    pretty_kv(&mut w, "posts", summary.posts.to_string())?;
    pretty_kv(&mut w, "reports", summary.reports.to_string())?;
    Ok(())
}
