//! `handa household`: registration, profile edits, and point awards.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_json, render_success};
use clap::Subcommand;
use handa_core::db::open_db;
use handa_core::model::household::{NewHousehold, PointSource};
use handa_core::store::household;
use std::io::stdout;
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand, Debug)]
pub enum HouseholdCommand {
    /// Register a new household.
    Register {
        /// Household id (a stable slug, e.g. hh-0001).
        household_id: String,
        /// Display name shown in feeds and leaderboards.
        #[arg(long)]
        name: String,
        /// City code of the locality scope.
        #[arg(long)]
        city: String,
        /// Barangay code within the city.
        #[arg(long)]
        barangay: String,
    },
    /// Show one household.
    Show { household_id: String },
    /// Award points to one source.
    Award {
        household_id: String,
        /// Point source: go-bag, modules, or community.
        #[arg(long)]
        source: String,
        /// Points to add.
        #[arg(long)]
        points: i64,
    },
    /// Update display name and/or profile image.
    Profile {
        household_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
}

pub fn run_household(
    command: &HouseholdCommand,
    db_path: &Path,
    output: OutputMode,
) -> anyhow::Result<()> {
    let conn = open_db(db_path)?;

    match command {
        HouseholdCommand::Register {
            household_id,
            name,
            city,
            barangay,
        } => {
            let created = household::register(
                &conn,
                &NewHousehold {
                    household_id: household_id.clone(),
                    display_name: name.clone(),
                    city_code: city.clone(),
                    barangay_code: barangay.clone(),
                    profile_image: None,
                },
            )?;
            render_success(
                output,
                &format!("Registered '{}' in {barangay}, {city}", created.household_id),
            )
        }
        HouseholdCommand::Show { household_id } => {
            let found = household::get(&conn, household_id)?;
            if output.is_json() {
                return render_json(&found);
            }
            let mut w = stdout();
            pretty_section(&mut w, &found.display_name)?;
            pretty_kv(&mut w, "id", &found.household_id)?;
            pretty_kv(&mut w, "city", &found.city_code)?;
            pretty_kv(&mut w, "barangay", &found.barangay_code)?;
            pretty_kv(&mut w, "go-bag pts", found.points.go_bag.to_string())?;
            pretty_kv(&mut w, "module pts", found.points.modules.to_string())?;
            pretty_kv(&mut w, "community", found.points.community.to_string())?;
            pretty_kv(&mut w, "all-time", found.points.all_time().to_string())?;
            Ok(())
        }
        HouseholdCommand::Award {
            household_id,
            source,
            points,
        } => {
            let source = PointSource::from_str(source)?;
            household::add_points(&conn, household_id, source, *points)?;
            render_success(
                output,
                &format!("Awarded {points} {source} point(s) to '{household_id}'"),
            )
        }
        HouseholdCommand::Profile {
            household_id,
            name,
            image,
        } => {
            household::update_profile(&conn, household_id, name.as_deref(), image.as_deref())?;
            render_success(output, &format!("Updated profile of '{household_id}'"))
        }
    }
}
