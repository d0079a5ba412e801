//! `handa analytics`: LGU readiness rollups for one barangay.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_json};
use clap::Args;
use handa_core::db::open_db;
use handa_core::store::catalog;
use handa_rank::{item_breakdown, readiness_distribution};
use serde::Serialize;
use std::io::stdout;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    /// Barangay code to roll up.
    #[arg(long)]
    pub barangay: String,

    /// Also print the per-item frequency breakdown.
    #[arg(long)]
    pub items: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsView {
    barangay: String,
    distribution: handa_rank::ReadinessDistribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<Vec<handa_rank::ItemFrequency>>,
}

pub fn run_analytics(
    args: &AnalyticsArgs,
    db_path: &Path,
    output: OutputMode,
) -> anyhow::Result<()> {
    let conn = open_db(db_path)?;
    let catalog_size = catalog::size(&conn)?;

    let view = AnalyticsView {
        distribution: readiness_distribution(&conn, &args.barangay, catalog_size)?,
        breakdown: if args.items {
            Some(item_breakdown(&conn, &args.barangay)?)
        } else {
            None
        },
        barangay: args.barangay.clone(),
    };

    if output.is_json() {
        return render_json(&view);
    }

    let mut w = stdout();
    pretty_section(&mut w, &format!("Readiness in {}", view.barangay))?;

    if view.distribution.total == 0 {
        println!("No go-bag records in this barangay yet.");
    } else {
        let d = view.distribution;
        pretty_kv(&mut w, "fully", d.fully_prepared.to_string())?;
        pretty_kv(&mut w, "partially", d.partially_prepared.to_string())?;
        pretty_kv(&mut w, "at risk", d.at_risk.to_string())?;
        pretty_kv(&mut w, "total", d.total.to_string())?;
    }

    if let Some(breakdown) = &view.breakdown {
        println!();
        pretty_section(&mut w, "Item frequency")?;
        for row in breakdown {
            println!("{:>3}%  {:<28} ({} bag(s))", row.percentage, row.item_name, row.raw_count);
        }
    }

    Ok(())
}
