//! Database operations for the `reports` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `reports` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub report_date: NaiveDate,
    pub report_path: String,
    pub trends_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Record a generated report and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_report(
    pool: &SqlitePool,
    report_date: NaiveDate,
    report_path: &str,
    trends_count: i64,
) -> Result<i64, DbError> {
    let result = sqlx::query(
        "INSERT INTO reports (report_date, report_path, trends_count, created_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(report_date)
    .bind(report_path)
    .bind(trends_count)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List the most recent report records, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reports(pool: &SqlitePool, limit: i64) -> Result<Vec<ReportRow>, DbError> {
    let rows = sqlx::query_as::<_, ReportRow>(
        "SELECT id, report_date, report_path, trends_count, created_at \
         FROM reports \
         ORDER BY created_at DESC, id DESC \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
