//! `handa catalog`: load and list the checklist item catalog.

use crate::output::{OutputMode, render_json, render_success};
use clap::Subcommand;
use handa_core::db::open_db;
use handa_core::store::catalog;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Load catalog items from a TOML file ([[item]] tables).
    Load {
        /// Path to the catalog definition file.
        path: PathBuf,
    },
    /// List the full catalog.
    List,
}

pub fn run_catalog(
    command: &CatalogCommand,
    db_path: &Path,
    output: OutputMode,
) -> anyhow::Result<()> {
    let conn = open_db(db_path)?;

    match command {
        CatalogCommand::Load { path } => {
            let inserted = catalog::load_from_path(&conn, path)?;
            render_success(
                output,
                &format!("Loaded {inserted} new catalog item(s) from {}", path.display()),
            )
        }
        CatalogCommand::List => {
            let items = catalog::list(&conn)?;
            if output.is_json() {
                return render_json(&items);
            }
            for item in &items {
                println!("{:<16} {:<28} {}", item.item_id, item.name, item.category);
            }
            if items.is_empty() {
                println!("Catalog is empty. Load one with `handa catalog load <file>`.");
            }
            Ok(())
        }
    }
}
