#![forbid(unsafe_code)]
//! handa-feed library.
//!
//! Builds paginated, searchable, optionally deduplicated views over the
//! post archive joined with household identity. The pipeline is a fixed
//! sequence of discrete, independently testable stages; see [`stage`].
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod builder;
pub mod query;
pub mod stage;

pub use builder::{FeedPost, FeedResult, build_feed};
pub use query::{FeedQuery, FeedSort, Page, SortDir};
