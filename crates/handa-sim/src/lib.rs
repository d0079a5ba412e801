#![forbid(unsafe_code)]
//! handa-sim library.
//!
//! Deterministic fixture generation for demos and tests. Fixtures are
//! applied strictly through the public store operations; nothing in here
//! is referenced by production code paths.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod fixture;
pub mod rng;
pub mod seed;

pub use fixture::Fixture;
pub use rng::DeterministicRng;
pub use seed::{SeedSummary, seed_database};
