//! End-to-end emission of a report bundle into scratch directories.

use chrono::{TimeZone, Utc};
use trendwatch_core::{Observation, Platform};
use trendwatch_report::{
    export_csv, render_charts, write_charts, write_html_report, ReportMetrics, CSV_HEADER,
};

fn sample() -> Vec<Observation> {
    let ts = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
    let mut seo = Observation::new("SEO, SEM audit", Platform::GoogleTrends, 55)
        .with_engagement(55.0)
        .with_timestamp(ts)
        .with_metadata(serde_json::json!({"max_interest": 80, "trend_direction": "rising"}));
    seo.category = "SEO & SEM".to_string();
    seo.sentiment_score = 0.4;

    let mut post = Observation::new("Newsletter open rates tanked", Platform::Reddit, 12)
        .with_engagement(40.0)
        .with_timestamp(ts);
    post.category = "Email Marketing".to_string();
    post.sentiment_score = -0.5;

    vec![seo, post]
}

#[test]
fn bundle_is_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let charts_dir = dir.path().join("charts");
    let reports_dir = dir.path().join("reports");
    let data = sample();
    let now = Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap();

    let charts = render_charts(&data);
    let chart_paths = write_charts(&charts_dir, &charts).unwrap();
    assert_eq!(chart_paths.len(), 4);

    let metrics = ReportMetrics::from_observations(&data, "Last 7 Days");
    let report = write_html_report(&reports_dir, None, &data, &charts, &metrics, now).unwrap();
    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("SEO, SEM audit"));
    assert!(html.contains("Newsletter open rates tanked"));
    assert!(html.contains("<h3>Platforms Monitored</h3><p>2</p>"));

    let csv_path = dir.path().join("trends_export.csv");
    let rows = export_csv(&csv_path, &data).unwrap();
    assert_eq!(rows, 2);
    let text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert!(lines.next().unwrap().starts_with("\"SEO; SEM audit\""));
}
