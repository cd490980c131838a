//! Store query handlers shared by the `db` subcommands and the menu.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sqlx::SqlitePool;
use trendwatch_core::{sentiment_label, summarize_keywords, Observation};

use crate::display::{banner, ellipsize, rule, whole};

pub(crate) const DEFAULT_RECENT_DAYS: u32 = 7;
pub(crate) const DEFAULT_RECENT_LIMIT: u32 = 50;
pub(crate) const DEFAULT_TOP_N: usize = 20;
pub(crate) const DEFAULT_EXPORT_FILE: &str = "trends_export.csv";
pub(crate) const DEFAULT_EXPORT_DAYS: u32 = 30;
pub(crate) const DEFAULT_PURGE_DAYS: u32 = 90;
pub(crate) const SUMMARY_WINDOW_DAYS: u32 = 7;

/// Observations of a trailing window plus the number of stored rows that
/// could not be decoded.
#[derive(Debug)]
pub(crate) struct Window {
    pub observations: Vec<Observation>,
    pub skipped: usize,
}

/// Load the observations of a trailing window, newest first.
pub(crate) async fn observations_since(pool: &SqlitePool, days: u32) -> anyhow::Result<Window> {
    let since = trendwatch_db::window_start(Utc::now(), days);
    let rows = trendwatch_db::list_trends_since(pool, since).await?;

    let mut window = Window {
        observations: Vec::with_capacity(rows.len()),
        skipped: 0,
    };
    for row in rows {
        let id = row.id;
        match row.into_observation() {
            Ok(obs) => window.observations.push(obs),
            Err(e) => {
                tracing::warn!(id, error = %e, "skipping unreadable trend row");
                window.skipped += 1;
            }
        }
    }
    Ok(window)
}

fn skipped_note(skipped: usize) -> String {
    if skipped == 0 {
        String::new()
    } else {
        format!(" ({skipped} unreadable rows skipped)")
    }
}

pub(crate) async fn print_summary(pool: &SqlitePool, top_n: usize) -> anyhow::Result<()> {
    let window = observations_since(pool, SUMMARY_WINDOW_DAYS).await?;
    let summaries = summarize_keywords(&window.observations, top_n);

    banner(&format!("TOP {top_n} CURRENT MARKETING TRENDS"), 100);
    if summaries.is_empty() {
        println!("no trends stored in the last {SUMMARY_WINDOW_DAYS} days; run `trendwatch extract` first");
        return Ok(());
    }

    println!(
        "{:<4} {:<50} {:<25} {:<10} {:<10}",
        "#", "Trend", "Category", "Score", "Sentiment"
    );
    rule(100);
    for (idx, s) in summaries.iter().enumerate() {
        let category = s.categories.first().map_or("General", String::as_str);
        println!(
            "{:<4} {:<50} {:<25} {:<10} {:<10}",
            idx + 1,
            ellipsize(&s.keyword, 50),
            ellipsize(category, 25),
            whole(s.combined_score),
            sentiment_label(s.avg_sentiment)
        );
    }
    if window.skipped > 0 {
        println!("{} unreadable rows skipped", window.skipped);
    }
    Ok(())
}

pub(crate) async fn print_recent(pool: &SqlitePool, days: u32, limit: u32) -> anyhow::Result<()> {
    let since = trendwatch_db::window_start(Utc::now(), days);
    let rows = trendwatch_db::list_recent_ranked(pool, since, i64::from(limit)).await?;

    banner(&format!("RECENT TRENDS (Last {days} days)"), 100);
    println!(
        "{:<40} {:<15} {:<20} {:<10} {:<10}",
        "Keyword", "Platform", "Category", "Score", "Sentiment"
    );
    rule(100);
    for row in &rows {
        #[allow(clippy::cast_precision_loss)]
        let score = row.volume as f64 + row.engagement_score;
        println!(
            "{:<40} {:<15} {:<20} {:<10} {:<10}",
            ellipsize(&row.keyword, 40),
            row.platform,
            row.category,
            whole(score),
            sentiment_label(row.sentiment_score)
        );
    }
    println!();
    println!("Total trends found: {}", rows.len());
    Ok(())
}

pub(crate) async fn print_stats(pool: &SqlitePool) -> anyhow::Result<()> {
    let stats = trendwatch_db::trend_stats(pool).await?;

    banner("DATABASE STATISTICS", 60);
    println!("Total Trends Stored: {}", stats.total);
    println!("Average Sentiment: {:.2}", stats.avg_sentiment);
    if let (Some(first), Some(last)) = (stats.first_seen, stats.last_seen) {
        println!(
            "Date Range: {} to {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }

    println!();
    println!("{:<20} {:<10}", "Platform", "Count");
    rule(30);
    for p in &stats.by_platform {
        println!("{:<20} {:<10}", p.platform, p.count);
    }

    println!();
    println!("{:<30} {:<10}", "Category", "Count");
    rule(40);
    for c in &stats.by_category {
        println!("{:<30} {:<10}", c.category, c.count);
    }
    Ok(())
}

pub(crate) async fn print_search(pool: &SqlitePool, text: &str) -> anyhow::Result<()> {
    let rows = trendwatch_db::search_trends(pool, text).await?;

    banner(&format!("SEARCH RESULTS FOR: '{text}'"), 100);
    if rows.is_empty() {
        println!("No trends found matching your search.");
        return Ok(());
    }

    println!(
        "{:<40} {:<15} {:<20} {:<12}",
        "Keyword", "Platform", "Category", "Date"
    );
    rule(100);
    for row in &rows {
        println!(
            "{:<40} {:<15} {:<20} {:<12}",
            ellipsize(&row.keyword, 40),
            row.platform,
            row.category,
            row.timestamp.format("%Y-%m-%d").to_string()
        );
    }
    println!();
    println!("Total results found: {}", rows.len());
    Ok(())
}

pub(crate) async fn print_top_keywords(
    pool: &SqlitePool,
    days: u32,
    top_n: usize,
) -> anyhow::Result<()> {
    let since = trendwatch_db::window_start(Utc::now(), days);
    let limit = i64::try_from(top_n).unwrap_or(i64::MAX);
    let rows = trendwatch_db::top_keywords(pool, since, limit).await?;

    banner(
        &format!("TOP {top_n} TRENDING KEYWORDS (Last {days} days)"),
        100,
    );
    println!(
        "{:<4} {:<45} {:<12} {:<12} {:<10}",
        "#", "Keyword", "Frequency", "Avg Volume", "Sentiment"
    );
    rule(100);
    for (idx, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<45} {:<12} {:<12} {:<10}",
            idx + 1,
            ellipsize(&row.keyword, 45),
            row.frequency,
            whole(row.avg_volume),
            sentiment_label(row.avg_sentiment)
        );
    }
    Ok(())
}

/// Write the window to CSV and return the number of rows exported.
pub(crate) async fn export(pool: &SqlitePool, output: &Path, days: u32) -> anyhow::Result<usize> {
    let window = observations_since(pool, days).await?;
    let written = trendwatch_report::export_csv(output, &window.observations)?;
    println!(
        "Exported {written} trends to {}{}",
        output.display(),
        skipped_note(window.skipped)
    );
    Ok(written)
}

pub(crate) async fn count_old(pool: &SqlitePool, days: u32) -> anyhow::Result<i64> {
    let cutoff = trendwatch_db::window_start(Utc::now(), days);
    Ok(trendwatch_db::count_trends_before(pool, cutoff).await?)
}

pub(crate) async fn purge(pool: &SqlitePool, days: u32) -> anyhow::Result<u64> {
    let cutoff = trendwatch_db::window_start(Utc::now(), days);
    let deleted = trendwatch_db::delete_trends_before(pool, cutoff).await?;
    println!("Deleted {deleted} old trends.");
    Ok(deleted)
}

pub(crate) async fn backup(pool: &SqlitePool, output: Option<PathBuf>) -> anyhow::Result<()> {
    let target = output.unwrap_or_else(|| trendwatch_db::default_backup_name(Utc::now()));
    let written = trendwatch_db::backup_database(pool, &target).await?;
    println!("Database backed up to: {}", written.display());
    Ok(())
}

pub(crate) async fn print_reports(pool: &SqlitePool, limit: u32) -> anyhow::Result<()> {
    let reports = trendwatch_db::list_reports(pool, i64::from(limit)).await?;
    if reports.is_empty() {
        println!("no reports generated yet; run `trendwatch extract` first");
        return Ok(());
    }

    println!("{:<12}{:<8}{:<18}PATH", "DATE", "TRENDS", "CREATED");
    for r in &reports {
        println!(
            "{:<12}{:<8}{:<18}{}",
            r.report_date.format("%Y-%m-%d").to_string(),
            r.trends_count,
            r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            r.report_path
        );
    }
    Ok(())
}
