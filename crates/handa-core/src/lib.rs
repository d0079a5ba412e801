//! handa-core library.
//!
//! # Conventions
//!
//! - **Errors**: write paths return [`error::EngineError`]; read/aggregation
//!   paths return `anyhow::Result` and propagate storage failures as-is.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod page;
pub mod score;
pub mod store;
