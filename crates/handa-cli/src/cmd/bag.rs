//! `handa bag`: go-bag edits and the completeness readout.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_json, render_success};
use clap::Subcommand;
use handa_core::db::open_db;
use handa_core::score::completeness;
use handa_core::store::{catalog, gobag};
use serde::Serialize;
use std::io::stdout;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum BagCommand {
    /// Show a household's bag and completeness score (creates an empty
    /// bag on first access).
    Show { household_id: String },
    /// Add one checklist item (a no-op when already held).
    Add {
        household_id: String,
        item_id: String,
    },
    /// Remove one checklist item.
    Remove {
        household_id: String,
        item_id: String,
    },
    /// Replace the whole checklist (and optionally the photo) in one step.
    Set {
        household_id: String,
        /// Comma-separated item ids forming the complete new checklist.
        #[arg(long, value_delimiter = ',')]
        items: Vec<String>,
        /// New bag photo reference.
        #[arg(long)]
        image: Option<String>,
    },
    /// Show only the bag photo reference.
    Image { household_id: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BagView {
    household_id: String,
    items: Vec<String>,
    image_ref: Option<String>,
    completeness: u8,
}

pub fn run_bag(command: &BagCommand, db_path: &Path, output: OutputMode) -> anyhow::Result<()> {
    let mut conn = open_db(db_path)?;

    match command {
        BagCommand::Show { household_id } => {
            let bag = gobag::get_or_create(&conn, household_id)?;
            let catalog_size = catalog::size(&conn)?;
            let view = BagView {
                completeness: completeness(bag.items.len(), catalog_size),
                household_id: bag.household_id,
                items: bag.items,
                image_ref: bag.image_ref,
            };

            if output.is_json() {
                return render_json(&view);
            }
            let mut w = stdout();
            pretty_section(&mut w, &format!("Go-bag of {}", view.household_id))?;
            pretty_kv(&mut w, "completeness", format!("{}%", view.completeness))?;
            pretty_kv(&mut w, "items", view.items.len().to_string())?;
            pretty_kv(&mut w, "photo", view.image_ref.as_deref().unwrap_or("(none)"))?;
            for item in &view.items {
                println!("  - {item}");
            }
            Ok(())
        }
        BagCommand::Add {
            household_id,
            item_id,
        } => {
            gobag::add_item(&mut conn, household_id, item_id)?;
            render_success(output, &format!("Added '{item_id}' to '{household_id}'"))
        }
        BagCommand::Remove {
            household_id,
            item_id,
        } => {
            gobag::remove_item(&mut conn, household_id, item_id)?;
            render_success(output, &format!("Removed '{item_id}' from '{household_id}'"))
        }
        BagCommand::Set {
            household_id,
            items,
            image,
        } => {
            gobag::replace_all(&mut conn, household_id, items, image.as_deref())?;
            render_success(
                output,
                &format!("Replaced checklist of '{household_id}' ({} item(s))", items.len()),
            )
        }
        BagCommand::Image { household_id } => {
            let image = gobag::get_image(&conn, household_id)?;
            if output.is_json() {
                return render_json(&serde_json::json!({ "imageRef": image }));
            }
            println!("{}", image.as_deref().unwrap_or("(none)"));
            Ok(())
        }
    }
}
