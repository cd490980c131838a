//! Database operations for the `trends` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use trendwatch_core::{Observation, Platform};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `trends` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendRow {
    pub id: i64,
    pub keyword: String,
    pub platform: String,
    pub category: String,
    pub volume: i64,
    pub sentiment_score: f64,
    pub engagement_score: f64,
    pub timestamp: DateTime<Utc>,
    pub metadata: String,
}

impl TrendRow {
    /// Convert the stored row back into a domain [`Observation`].
    ///
    /// An empty or unparsable metadata column becomes an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRow`] if the platform is not recognised.
    pub fn into_observation(self) -> Result<Observation, DbError> {
        let platform: Platform = self.platform.parse().map_err(|e| DbError::InvalidRow {
            id: self.id,
            reason: format!("{e}"),
        })?;

        let metadata = serde_json::from_str::<serde_json::Value>(&self.metadata)
            .ok()
            .filter(serde_json::Value::is_object)
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        Ok(Observation {
            keyword: self.keyword,
            platform,
            category: self.category,
            volume: self.volume,
            sentiment_score: self.sentiment_score,
            engagement_score: self.engagement_score,
            timestamp: self.timestamp,
            metadata,
        })
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PlatformCount {
    pub platform: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Whole-table statistics.
#[derive(Debug, Clone)]
pub struct TrendStats {
    pub total: i64,
    pub by_platform: Vec<PlatformCount>,
    /// Most common category first.
    pub by_category: Vec<CategoryCount>,
    /// 0.0 when the table is empty.
    pub avg_sentiment: f64,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// A keyword's frequency inside a trailing window.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct KeywordFrequencyRow {
    pub keyword: String,
    pub frequency: i64,
    pub avg_volume: f64,
    pub avg_sentiment: f64,
}

const TREND_COLUMNS: &str = "id, keyword, platform, category, volume, sentiment_score, \
                             engagement_score, timestamp, metadata";

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert one observation and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_trend(pool: &SqlitePool, observation: &Observation) -> Result<i64, DbError> {
    let metadata = observation.metadata.to_string();

    let result = sqlx::query(
        "INSERT INTO trends \
             (keyword, platform, category, volume, sentiment_score, engagement_score, \
              timestamp, metadata) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&observation.keyword)
    .bind(observation.platform.as_str())
    .bind(&observation.category)
    .bind(observation.volume)
    .bind(observation.sentiment_score)
    .bind(observation.engagement_score)
    .bind(observation.timestamp)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Count rows whose timestamp falls before `cutoff`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_trends_before(pool: &SqlitePool, cutoff: NaiveDate) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trends WHERE DATE(timestamp) < ?")
        .bind(cutoff)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Delete every row whose timestamp falls before `cutoff` and return how many
/// were removed. Rows dated on `cutoff` or later are kept.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_trends_before(pool: &SqlitePool, cutoff: NaiveDate) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM trends WHERE DATE(timestamp) < ?")
        .bind(cutoff)
        .execute(pool)
        .await?;

    tracing::info!(%cutoff, deleted = result.rows_affected(), "purged old trends");
    Ok(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// List rows dated on or after `since`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_trends_since(
    pool: &SqlitePool,
    since: NaiveDate,
) -> Result<Vec<TrendRow>, DbError> {
    let rows = sqlx::query_as::<_, TrendRow>(&format!(
        "SELECT {TREND_COLUMNS} FROM trends \
         WHERE DATE(timestamp) >= ? \
         ORDER BY timestamp DESC, id DESC"
    ))
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List rows dated on or after `since`, ranked by volume + engagement.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_ranked(
    pool: &SqlitePool,
    since: NaiveDate,
    limit: i64,
) -> Result<Vec<TrendRow>, DbError> {
    let rows = sqlx::query_as::<_, TrendRow>(&format!(
        "SELECT {TREND_COLUMNS} FROM trends \
         WHERE DATE(timestamp) >= ? \
         ORDER BY (volume + engagement_score) DESC, id ASC \
         LIMIT ?"
    ))
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Find rows whose keyword contains `query`, newest first.
///
/// `%` and `_` in `query` match literally.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_trends(pool: &SqlitePool, query: &str) -> Result<Vec<TrendRow>, DbError> {
    let pattern = format!("%{}%", escape_like(query));

    let rows = sqlx::query_as::<_, TrendRow>(&format!(
        "SELECT {TREND_COLUMNS} FROM trends \
         WHERE keyword LIKE ? ESCAPE '\\' \
         ORDER BY timestamp DESC, id DESC"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Collect whole-table statistics.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn trend_stats(pool: &SqlitePool) -> Result<TrendStats, DbError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trends")
        .fetch_one(pool)
        .await?;

    let by_platform = sqlx::query_as::<_, PlatformCount>(
        "SELECT platform, COUNT(*) AS count FROM trends \
         GROUP BY platform ORDER BY platform",
    )
    .fetch_all(pool)
    .await?;

    let by_category = sqlx::query_as::<_, CategoryCount>(
        "SELECT category, COUNT(*) AS count FROM trends \
         GROUP BY category ORDER BY count DESC, category ASC",
    )
    .fetch_all(pool)
    .await?;

    let avg_sentiment: Option<f64> = sqlx::query_scalar("SELECT AVG(sentiment_score) FROM trends")
        .fetch_one(pool)
        .await?;

    let first_seen: Option<DateTime<Utc>> =
        sqlx::query_scalar("SELECT timestamp FROM trends ORDER BY timestamp ASC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    let last_seen: Option<DateTime<Utc>> =
        sqlx::query_scalar("SELECT timestamp FROM trends ORDER BY timestamp DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(TrendStats {
        total,
        by_platform,
        by_category,
        avg_sentiment: avg_sentiment.unwrap_or(0.0),
        first_seen,
        last_seen,
    })
}

/// Most frequent keywords dated on or after `since`.
///
/// Ordered by frequency, then by average volume, both descending.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn top_keywords(
    pool: &SqlitePool,
    since: NaiveDate,
    limit: i64,
) -> Result<Vec<KeywordFrequencyRow>, DbError> {
    let rows = sqlx::query_as::<_, KeywordFrequencyRow>(
        "SELECT keyword, \
                COUNT(*) AS frequency, \
                CAST(AVG(volume) AS REAL) AS avg_volume, \
                CAST(AVG(sentiment_score) AS REAL) AS avg_sentiment \
         FROM trends \
         WHERE DATE(timestamp) >= ? \
         GROUP BY keyword \
         ORDER BY frequency DESC, avg_volume DESC, keyword ASC \
         LIMIT ?",
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50% off_now"), "50\\% off\\_now");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn trend_row_with_bad_metadata_gets_empty_object() {
        let row = TrendRow {
            id: 1,
            keyword: "seo".to_string(),
            platform: "Google Trends".to_string(),
            category: "SEO & SEM".to_string(),
            volume: 10,
            sentiment_score: 0.1,
            engagement_score: 10.0,
            timestamp: Utc::now(),
            metadata: "not json".to_string(),
        };
        let obs = row.into_observation().unwrap();
        assert_eq!(obs.platform, Platform::GoogleTrends);
        assert!(obs.metadata.as_object().is_some_and(serde_json::Map::is_empty));
    }

    #[test]
    fn trend_row_with_unknown_platform_is_rejected() {
        let row = TrendRow {
            id: 9,
            keyword: "x".to_string(),
            platform: "Myspace".to_string(),
            category: "General Marketing".to_string(),
            volume: 0,
            sentiment_score: 0.0,
            engagement_score: 0.0,
            timestamp: Utc::now(),
            metadata: "{}".to_string(),
        };
        assert!(matches!(
            row.into_observation(),
            Err(DbError::InvalidRow { id: 9, .. })
        ));
    }
}
