//! The extraction workflow: collect, categorize, score, persist, report.
//!
//! Stages run one after another. A failed external call is absorbed by the
//! source or scorer that made it; only a run in which every call of every
//! source failed is aborted, so a dead upstream never produces an empty
//! report that looks like a quiet week.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use trendwatch_core::{default_categories, load_categories, AppConfig, Categorizer, Observation};
use trendwatch_report::{
    render_charts, write_charts, write_html_report, write_pdf_report, ReportMetrics,
};
use trendwatch_sentiment::{score_batch, GeminiScorer, NeutralScorer, SentimentScorer};
use trendwatch_sources::{
    Collection, GoogleTrendsClient, GoogleTrendsSource, RedditClient, RedditSource, TrendSource,
};

const REPORT_PERIOD: &str = "Last 7 Days";

/// Output locations and pacing for one workflow run.
pub(crate) struct WorkflowSettings {
    pub charts_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub sentiment_delay: Duration,
}

impl WorkflowSettings {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            charts_dir: config.charts_dir.clone(),
            reports_dir: config.reports_dir.clone(),
            sentiment_delay: Duration::from_millis(config.sentiment_delay_ms),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ExtractOutcome {
    pub observations: Vec<Observation>,
    pub chart_paths: Vec<PathBuf>,
    pub report_path: PathBuf,
    pub pdf_path: PathBuf,
    pub report_id: i64,
}

/// Build every enabled source from configuration.
///
/// The social source is only enabled when Reddit credentials are configured.
pub(crate) fn build_sources(config: &AppConfig) -> anyhow::Result<Vec<Box<dyn TrendSource>>> {
    let mut sources: Vec<Box<dyn TrendSource>> = Vec::new();

    let trends_client = GoogleTrendsClient::new(
        config.request_timeout_secs,
        &config.trends_timeframe,
        &config.trends_geo,
    )?;
    sources.push(Box::new(GoogleTrendsSource::new(
        trends_client,
        config.keywords.clone(),
        Duration::from_millis(config.trends_delay_ms),
    )));

    match &config.reddit {
        Some(credentials) => {
            let client = RedditClient::new(
                credentials.clone(),
                &config.reddit_user_agent,
                config.request_timeout_secs,
            )?;
            sources.push(Box::new(RedditSource::new(
                client,
                config.subreddits.clone(),
                config.reddit_post_limit,
                Duration::from_millis(config.reddit_delay_ms),
            )));
        }
        None => tracing::info!("Reddit credentials not configured; skipping Reddit source"),
    }

    Ok(sources)
}

pub(crate) fn build_scorer(config: &AppConfig) -> anyhow::Result<Box<dyn SentimentScorer>> {
    match &config.gemini_api_key {
        Some(key) => Ok(Box::new(GeminiScorer::new(
            key,
            &config.gemini_model,
            config.request_timeout_secs,
        )?)),
        None => {
            tracing::warn!("GEMINI_API_KEY not set; every sentiment score will be 0.0");
            Ok(Box::new(NeutralScorer))
        }
    }
}

/// Run the workflow with sources and scorer built from `config`, then print
/// where the outputs went.
pub(crate) async fn run_extract(
    pool: &SqlitePool,
    config: &AppConfig,
) -> anyhow::Result<ExtractOutcome> {
    let rules = match &config.categories_path {
        Some(path) => load_categories(path)?,
        None => default_categories(),
    };
    let categorizer = Categorizer::new(&rules);
    let sources = build_sources(config)?;
    let scorer = build_scorer(config)?;
    let settings = WorkflowSettings::from_config(config);

    let outcome = run_workflow(
        pool,
        &sources,
        &categorizer,
        scorer.as_ref(),
        &settings,
        Utc::now(),
    )
    .await?;
    tracing::info!(report_id = outcome.report_id, "report recorded");

    println!("Processed {} trends", outcome.observations.len());
    println!("HTML report: {}", outcome.report_path.display());
    println!("PDF report: {}", outcome.pdf_path.display());
    println!("Charts:");
    for path in &outcome.chart_paths {
        println!("  - {}", path.display());
    }

    Ok(outcome)
}

pub(crate) async fn run_workflow(
    pool: &SqlitePool,
    sources: &[Box<dyn TrendSource>],
    categorizer: &Categorizer,
    scorer: &dyn SentimentScorer,
    settings: &WorkflowSettings,
    now: DateTime<Utc>,
) -> anyhow::Result<ExtractOutcome> {
    let collected = collect_all(sources).await?;
    tracing::info!(trends = collected.len(), "extracted trends from all sources");

    let processed = process(pool, collected, categorizer, scorer, settings.sentiment_delay).await?;

    let charts = render_charts(&processed);
    let chart_paths = write_charts(&settings.charts_dir, &charts)?;

    let metrics = ReportMetrics::from_observations(&processed, REPORT_PERIOD);
    let report_path = write_html_report(
        &settings.reports_dir,
        None,
        &processed,
        &charts,
        &metrics,
        now,
    )?;
    let pdf_path = write_pdf_report(&settings.reports_dir, None, &processed, &metrics, now)?;

    let report_id = trendwatch_db::insert_report(
        pool,
        now.date_naive(),
        &report_path.to_string_lossy(),
        i64::try_from(processed.len()).unwrap_or(i64::MAX),
    )
    .await?;

    Ok(ExtractOutcome {
        observations: processed,
        chart_paths,
        report_path,
        pdf_path,
        report_id,
    })
}

/// Poll every source in order.
///
/// # Errors
///
/// Fails when calls were attempted and not a single one succeeded.
pub(crate) async fn collect_all(
    sources: &[Box<dyn TrendSource>],
) -> anyhow::Result<Vec<Observation>> {
    let mut all = Collection::default();

    for source in sources {
        tracing::info!(source = source.name(), "fetching trends");
        let collection = source.collect().await;
        tracing::info!(
            source = source.name(),
            items = collection.observations.len(),
            succeeded = collection.calls_succeeded,
            failed = collection.calls_failed,
            "source finished"
        );
        all.merge(collection);
    }

    if all.all_failed() {
        anyhow::bail!(
            "all {} trend source calls failed; nothing was collected",
            all.calls_failed
        );
    }
    if all.calls_failed > 0 {
        tracing::warn!(
            failed = all.calls_failed,
            succeeded = all.calls_succeeded,
            "some trend source calls failed; continuing with partial results"
        );
    }

    Ok(all.observations)
}

/// Categorize, score, back-fill and persist each observation.
async fn process(
    pool: &SqlitePool,
    mut observations: Vec<Observation>,
    categorizer: &Categorizer,
    scorer: &dyn SentimentScorer,
    sentiment_delay: Duration,
) -> anyhow::Result<Vec<Observation>> {
    for obs in &mut observations {
        obs.category = categorizer.categorize(&obs.keyword).to_string();
    }

    let texts: Vec<String> = observations.iter().map(|o| o.keyword.clone()).collect();
    let scores = score_batch(scorer, &texts, sentiment_delay).await;

    for (obs, score) in observations.iter_mut().zip(scores) {
        obs.sentiment_score = score;
        obs.backfill_engagement();
        trendwatch_db::insert_trend(pool, obs).await?;
    }

    tracing::info!(trends = observations.len(), "processed and stored trends");
    Ok(observations)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
