//! `handa post`: create, inspect, verify, and delete community posts.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_json, render_success};
use clap::Subcommand;
use handa_core::db::open_db;
use handa_core::model::post::NewPost;
use handa_core::store::post;
use std::io::stdout;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum PostCommand {
    /// Create a post, snapshotting the household's current bag.
    Create {
        household_id: String,
        #[arg(long)]
        caption: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Show one post with its snapshot.
    Show { post_id: String },
    /// Record one verification pass over a post's snapshot.
    Verify {
        post_id: String,
        /// How many snapshot items the verifier confirmed.
        #[arg(long)]
        items: u32,
    },
    /// Delete a post (owner takedown).
    Delete { post_id: String },
}

pub fn run_post(command: &PostCommand, db_path: &Path, output: OutputMode) -> anyhow::Result<()> {
    let mut conn = open_db(db_path)?;

    match command {
        PostCommand::Create {
            household_id,
            caption,
            image,
        } => {
            let created = post::create(
                &mut conn,
                &NewPost {
                    household_id: household_id.clone(),
                    caption: caption.clone(),
                    image_ref: image.clone(),
                },
            )?;
            render_success(
                output,
                &format!(
                    "Posted '{}' ({} snapshot item(s))",
                    created.post_id,
                    created.bag_snapshot.len()
                ),
            )
        }
        PostCommand::Show { post_id } => {
            let found = post::get(&conn, post_id)?;
            if output.is_json() {
                return render_json(&found);
            }
            let mut w = stdout();
            pretty_section(&mut w, &found.caption)?;
            pretty_kv(&mut w, "post", &found.post_id)?;
            pretty_kv(&mut w, "household", &found.household_id)?;
            pretty_kv(&mut w, "barangay", &found.barangay_code)?;
            pretty_kv(&mut w, "posted", format_timestamp(found.created_at_us))?;
            pretty_kv(&mut w, "verified", found.verified_item_count.to_string())?;
            pretty_kv(&mut w, "passes", found.verification_count.to_string())?;
            for item in &found.bag_snapshot {
                println!("  - {} ({})", item.name, item.category);
            }
            Ok(())
        }
        PostCommand::Verify { post_id, items } => {
            post::record_verification(&conn, post_id, *items)?;
            render_success(
                output,
                &format!("Recorded a verification pass on '{post_id}' ({items} item(s))"),
            )
        }
        PostCommand::Delete { post_id } => {
            post::delete(&conn, post_id)?;
            render_success(output, &format!("Deleted '{post_id}'"))
        }
    }
}

fn format_timestamp(at_us: i64) -> String {
    chrono::DateTime::from_timestamp_micros(at_us)
        .map_or_else(|| at_us.to_string(), |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
}
