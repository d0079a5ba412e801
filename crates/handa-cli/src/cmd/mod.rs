//! One module per subcommand: an `Args`/`Command` type plus a `run_*`
//! entry point taking the parsed arguments, the database path, and the
//! resolved output mode.

pub mod analytics;
pub mod bag;
pub mod catalog;
pub mod feed;
pub mod household;
pub mod init;
pub mod post;
pub mod report;
pub mod seed;
pub mod top;
