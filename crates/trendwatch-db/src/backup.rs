//! Full-database backup.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// Backup file name used when the caller does not choose one.
#[must_use]
pub fn default_backup_name(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("trends_backup_{}.db", now.format("%Y%m%d_%H%M%S")))
}

/// Write a complete copy of the open database to `target`.
///
/// Uses `VACUUM INTO`, so the copy is consistent even while the pool is open.
/// An existing file at `target` is never overwritten.
///
/// # Errors
///
/// Returns [`DbError::BackupExists`] if `target` already exists, or
/// [`DbError::Sqlx`] if SQLite cannot write the copy.
pub async fn backup_database(pool: &SqlitePool, target: &Path) -> Result<PathBuf, DbError> {
    if target.exists() {
        return Err(DbError::BackupExists(target.display().to_string()));
    }

    sqlx::query("VACUUM INTO ?")
        .bind(target.to_string_lossy().into_owned())
        .execute(pool)
        .await?;

    tracing::info!(target = %target.display(), "database backed up");
    Ok(target.to_path_buf())
}
