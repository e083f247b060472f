//! Connection handling for the `SQLite` backend.

use crate::{Error, Result};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// How long a writer waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Acquires a mutex, recovering the inner value if a previous holder panicked.
///
/// A panic mid-statement leaves no open transaction behind (rusqlite rolls
/// back on drop), so the connection is still usable.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("SQLite mutex was poisoned, recovering");
        metrics::counter!("sqlite_mutex_poison_recovery_total").increment(1);
        poisoned.into_inner()
    })
}

/// Applies WAL journaling, `NORMAL` sync and [`BUSY_TIMEOUT`].
///
/// In-memory databases keep their `memory` journal mode.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if a pragma is rejected.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| Error::operation("configure_sqlite", e))?;
    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(|e| Error::operation("configure_sqlite", e))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| Error::operation("configure_sqlite", e))?;

    tracing::debug!(journal_mode = %mode, "Configured SQLite connection");
    Ok(())
}
