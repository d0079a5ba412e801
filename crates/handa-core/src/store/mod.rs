//! Write paths and typed read helpers over the engine database.
//!
//! Mutations are single atomic SQL statements or single transactions,
//! never read-modify-write in application code, so two sessions editing the
//! same household concurrently cannot lose updates. Writes retry exactly
//! once on transient lock contention before surfacing a conflict; reads
//! propagate storage failures immediately.

pub mod catalog;
pub mod gobag;
pub mod household;
pub mod post;
pub mod report;

use crate::error::EngineError;

/// Current wall-clock time in microseconds.
pub(crate) fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

fn is_busy(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == rusqlite::ErrorCode::DatabaseBusy
                || code.code == rusqlite::ErrorCode::DatabaseLocked
    )
}

/// Run a write closure, retrying once when SQLite reports transient lock
/// contention. A second busy failure surfaces as a write conflict.
pub(crate) fn with_write_retry<T>(
    mut op: impl FnMut() -> Result<T, EngineError>,
) -> Result<T, EngineError> {
    match op() {
        Err(EngineError::Storage(error)) if is_busy(&error) => {
            tracing::debug!(%error, "retrying write after transient lock contention");
            op().map_err(|retry_error| match retry_error {
                EngineError::Storage(inner) if is_busy(&inner) => {
                    EngineError::WriteConflict("storage stayed busy past the retry")
                }
                other => other,
            })
        }
        result => result,
    }
}
