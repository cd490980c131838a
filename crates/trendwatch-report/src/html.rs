//! Self-contained HTML report.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use trendwatch_core::{sentiment_label, Observation};

use crate::charts::Chart;
use crate::error::ReportError;
use crate::svg::escape;
use crate::{count_in_order, top_observations};

pub const TOP_TRENDS_IN_TABLE: usize = 20;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 40px; background-color: #f5f5f5; }
.container { max-width: 1200px; margin: 0 auto; background-color: white; padding: 30px; box-shadow: 0 0 10px rgba(0,0,0,0.1); }
h1 { color: #2c3e50; text-align: center; }
h2 { color: #34495e; border-bottom: 2px solid #3498db; padding-bottom: 10px; }
.metrics { display: grid; grid-template-columns: repeat(2, 1fr); gap: 20px; margin: 20px 0; }
.metric-card { background: #ecf0f1; padding: 20px; border-radius: 5px; }
.metric-card h3 { margin: 0 0 10px 0; color: #2c3e50; }
.metric-card p { font-size: 24px; font-weight: bold; color: #3498db; margin: 0; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { padding: 12px; text-align: left; border: 1px solid #ddd; }
th { background-color: #3498db; color: white; }
tr:nth-child(even) { background-color: #f2f2f2; }
.chart { margin: 20px 0; text-align: center; }
.chart svg { max-width: 100%; height: auto; }
.timestamp { text-align: center; color: #7f8c8d; margin-top: 20px; }
";

/// Headline numbers shown at the top of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetrics {
    pub total_trends: usize,
    pub platforms_monitored: usize,
    /// 0.0 for an empty report.
    pub avg_sentiment: f64,
    pub most_common_category: Option<String>,
    pub period_label: String,
}

impl ReportMetrics {
    #[must_use]
    pub fn from_observations(observations: &[Observation], period_label: &str) -> Self {
        let platforms = count_in_order(observations.iter().map(|o| o.platform.as_str()));
        let categories = count_in_order(observations.iter().map(|o| o.category.as_str()));

        // max_by_key keeps the last maximum; iterate reversed so the first
        // declared category wins ties.
        let most_common_category = categories
            .iter()
            .rev()
            .max_by_key(|(_, n)| *n)
            .map(|(c, _)| (*c).to_string());

        #[allow(clippy::cast_precision_loss)]
        let avg_sentiment = if observations.is_empty() {
            0.0
        } else {
            observations.iter().map(|o| o.sentiment_score).sum::<f64>() / observations.len() as f64
        };

        Self {
            total_trends: observations.len(),
            platforms_monitored: platforms.len(),
            avg_sentiment,
            most_common_category,
            period_label: period_label.to_string(),
        }
    }
}

/// `trend_report_YYYYMMDD_HHMMSS.html`
#[must_use]
pub fn default_report_name(now: DateTime<Utc>) -> String {
    format!("trend_report_{}.html", now.format("%Y%m%d_%H%M%S"))
}

/// Render the report document. Charts are inlined as SVG.
#[must_use]
pub fn render_html_report(
    observations: &[Observation],
    charts: &[Chart],
    metrics: &ReportMetrics,
    generated_at: DateTime<Utc>,
) -> String {
    let mut html = String::with_capacity(16 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Digital Marketing Trends Report</title>\n<style>\n{STYLE}</style>\n</head>\n\
         <body>\n<div class=\"container\">\n<h1>Digital Marketing Trends Report</h1>\n\
         <p class=\"timestamp\">Generated on {}</p>\n",
        generated_at.format("%B %d, %Y at %H:%M UTC")
    );

    html.push_str("<h2>Key Metrics</h2>\n<div class=\"metrics\">\n");
    metric_card(&mut html, "Total Trends Analyzed", &metrics.total_trends.to_string());
    metric_card(
        &mut html,
        "Platforms Monitored",
        &metrics.platforms_monitored.to_string(),
    );
    metric_card(
        &mut html,
        "Average Sentiment",
        &format!("{:.2}", metrics.avg_sentiment),
    );
    metric_card(&mut html, "Report Period", &metrics.period_label);
    html.push_str("</div>\n");

    if let Some(category) = &metrics.most_common_category {
        let _ = writeln!(
            html,
            "<p>Most common category: <strong>{}</strong></p>",
            escape(category)
        );
    }

    html.push_str("<h2>Visual Analysis</h2>\n");
    for chart in charts {
        let _ = write!(
            html,
            "<div class=\"chart\">\n<h3>{}</h3>\n{}</div>\n",
            escape(chart.title),
            chart.svg
        );
    }

    let _ = write!(
        html,
        "<h2>Top {TOP_TRENDS_IN_TABLE} Marketing Trends</h2>\n<table>\n\
         <tr><th>Rank</th><th>Keyword</th><th>Category</th><th>Platform</th>\
         <th>Engagement Score</th><th>Sentiment</th></tr>\n"
    );
    for (rank, obs) in top_observations(observations, TOP_TRENDS_IN_TABLE)
        .into_iter()
        .enumerate()
    {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.0}</td><td>{} ({:.2})</td></tr>",
            rank + 1,
            escape(&obs.keyword),
            escape(&obs.category),
            obs.platform,
            obs.combined_score().trunc(),
            sentiment_label(obs.sentiment_score),
            obs.sentiment_score
        );
    }
    html.push_str("</table>\n</div>\n</body>\n</html>\n");

    html
}

/// Render the report and write it into `dir`. When `file_name` is `None`,
/// [`default_report_name`] is used.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the directory or file cannot be written.
pub fn write_html_report(
    dir: &Path,
    file_name: Option<&str>,
    observations: &[Observation],
    charts: &[Chart],
    metrics: &ReportMetrics,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf, ReportError> {
    crate::ensure_dir(dir)?;
    let name = file_name.map_or_else(|| default_report_name(generated_at), str::to_string);
    let path = dir.join(name);

    let html = render_html_report(observations, charts, metrics, generated_at);
    std::fs::write(&path, html).map_err(|e| ReportError::io(&path, e))?;

    tracing::info!(path = %path.display(), trends = observations.len(), "HTML report written");
    Ok(path)
}

fn metric_card(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        html,
        "<div class=\"metric-card\"><h3>{}</h3><p>{}</p></div>",
        escape(label),
        escape(value)
    );
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use trendwatch_core::Platform;

    use super::*;

    fn obs(keyword: &str, platform: Platform, volume: i64, sentiment: f64) -> Observation {
        let mut o = Observation::new(keyword, platform, volume).with_engagement(volume as f64);
        o.sentiment_score = sentiment;
        o
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 15).unwrap()
    }

    #[test]
    fn default_name_is_timestamped() {
        assert_eq!(
            default_report_name(fixed_time()),
            "trend_report_20260105_093015.html"
        );
    }

    #[test]
    fn metrics_summarise_observations() {
        let mut data = vec![
            obs("a", Platform::Reddit, 1, 0.5),
            obs("b", Platform::Reddit, 1, -0.1),
            obs("c", Platform::GoogleTrends, 1, 0.2),
        ];
        data[0].category = "SEO & SEM".to_string();
        let m = ReportMetrics::from_observations(&data, "Last 7 Days");
        assert_eq!(m.total_trends, 3);
        assert_eq!(m.platforms_monitored, 2);
        assert!((m.avg_sentiment - 0.2).abs() < 1e-9);
        assert_eq!(m.most_common_category.as_deref(), Some("General Marketing"));
    }

    #[test]
    fn most_common_category_tie_goes_to_first_seen() {
        let mut data = vec![
            obs("a", Platform::Reddit, 1, 0.0),
            obs("b", Platform::Reddit, 1, 0.0),
        ];
        data[0].category = "Email Marketing".to_string();
        data[1].category = "Content Marketing".to_string();
        let m = ReportMetrics::from_observations(&data, "Last 7 Days");
        assert_eq!(m.most_common_category.as_deref(), Some("Email Marketing"));
    }

    #[test]
    fn empty_metrics_are_zero() {
        let m = ReportMetrics::from_observations(&[], "Last 7 Days");
        assert_eq!(m.total_trends, 0);
        assert_eq!(m.avg_sentiment, 0.0);
        assert!(m.most_common_category.is_none());
    }

    #[test]
    fn report_escapes_keywords_and_labels_sentiment() {
        let data = vec![
            obs("<script>alert(1)</script>", Platform::Reddit, 100, 0.6),
            obs("Tom & Jerry ads", Platform::GoogleTrends, 10, -0.4),
        ];
        let metrics = ReportMetrics::from_observations(&data, "Last 7 Days");
        let html = render_html_report(&data, &[], &metrics, fixed_time());

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; Jerry ads"));
        assert!(html.contains("<td>1</td><td>&lt;script&gt;"));
        assert!(html.contains("<td>200</td><td>Positive (0.60)</td>"));
        assert!(html.contains("<td>20</td><td>Negative (-0.40)</td>"));
        assert!(html.contains("Generated on January 05, 2026 at 09:30 UTC"));
    }

    #[test]
    fn table_is_capped_at_twenty_rows() {
        let data: Vec<Observation> = (0..30)
            .map(|i| obs(&format!("kw{i}"), Platform::Reddit, i, 0.0))
            .collect();
        let metrics = ReportMetrics::from_observations(&data, "Last 7 Days");
        let html = render_html_report(&data, &[], &metrics, fixed_time());
        assert_eq!(html.matches("<tr><td>").count(), TOP_TRENDS_IN_TABLE);
        assert!(html.contains("<td>1</td><td>kw29</td>"));
    }

    #[test]
    fn charts_are_inlined() {
        let charts = crate::render_charts(&[obs("a", Platform::Reddit, 1, 0.0)]);
        let metrics = ReportMetrics::from_observations(&[], "Last 7 Days");
        let html = render_html_report(&[], &charts, &metrics, fixed_time());
        assert_eq!(html.matches("<svg ").count(), 4);
        assert!(html.contains("<h3>Sentiment Distribution</h3>"));
    }

    #[test]
    fn write_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = ReportMetrics::from_observations(&[], "Last 7 Days");
        let path =
            write_html_report(dir.path(), None, &[], &[], &metrics, fixed_time()).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("trend_report_20260105_093015.html")
        );
        assert!(std::fs::read_to_string(path).unwrap().contains("</html>"));
    }
}
