//! `handa init`: create (or migrate) the engine database.

use crate::output::{OutputMode, render_success};
use handa_core::db::open_db;
use std::path::Path;

pub fn run_init(db_path: &Path, output: OutputMode) -> anyhow::Result<()> {
    open_db(db_path)?;
    render_success(
        output,
        &format!("Engine database ready at {}", db_path.display()),
    )
}
