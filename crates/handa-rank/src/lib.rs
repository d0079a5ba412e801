#![forbid(unsafe_code)]
//! handa-rank library.
//!
//! Locality-scoped leaderboards over household point totals, and the LGU
//! analytics rollups (readiness distribution, item-frequency breakdown).
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod analytics;
pub mod leaderboard;

pub use analytics::{ItemFrequency, ReadinessDistribution, item_breakdown, readiness_distribution};
pub use leaderboard::{
    LeaderboardQuery, LeaderboardResult, Metric, RankedHousehold, build_leaderboard,
};
