use std::path::Path;

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

// Path relative to crates/trendwatch-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("backup target already exists: {0}")]
    BackupExists(String),
    #[error("invalid stored row {id}: {reason}")]
    InvalidRow { id: i64, reason: String },
}

/// Open the SQLite store at `path`, creating the file if needed.
///
/// The pool holds a single connection: the workflow is strictly sequential
/// and SQLite allows one writer at a time anyway.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the database cannot be opened.
pub async fn connect_pool(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize, sqlx::migrate::MigrateError> {
    // The _sqlx_migrations table does not exist on a fresh database; treat
    // absence as zero applied.
    let applied_before: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    MIGRATOR.run(pool).await?;

    let applied_after: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

/// Open the store and bring its schema up to date.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or migrated.
pub async fn open_store(path: &Path) -> Result<SqlitePool, DbError> {
    let pool = connect_pool(path).await?;
    let applied = run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(path = %path.display(), applied, "applied store migrations");
    }
    Ok(pool)
}

/// First calendar day (UTC) included in a trailing window of `days` days.
///
/// Rows whose timestamp falls on or after this date are "within the window".
#[must_use]
pub fn window_start(now: DateTime<Utc>, days: u32) -> NaiveDate {
    let today = now.date_naive();
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

pub mod backup;
pub mod reports;
pub mod trends;

pub use backup::{backup_database, default_backup_name};
pub use reports::{insert_report, list_reports, ReportRow};
pub use trends::{
    count_trends_before, delete_trends_before, insert_trend, list_recent_ranked,
    list_trends_since, search_trends, top_keywords, trend_stats, CategoryCount,
    KeywordFrequencyRow, PlatformCount, TrendRow, TrendStats,
};

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn window_start_counts_back_whole_days() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 0).unwrap();
        assert_eq!(
            window_start(now, 7),
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
        assert_eq!(window_start(now, 0), now.date_naive());
    }

    #[test]
    fn window_start_crosses_month_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(
            window_start(now, 3),
            NaiveDate::from_ymd_opt(2026, 2, 27).unwrap()
        );
    }
}
