//! Integration tests for the Google Trends collector using wiremock HTTP mocks.

use std::time::Duration;

use trendwatch_core::Platform;
use trendwatch_sources::{GoogleTrendsClient, GoogleTrendsSource, TrendSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches requests whose `req` query parameter mentions the given text.
struct ReqMentions(&'static str);

impl Match for ReqMentions {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .any(|(k, v)| k == "req" && v.contains(self.0))
    }
}

fn test_client(base_url: &str) -> GoogleTrendsClient {
    GoogleTrendsClient::with_base_url(30, "now 7-d", "US", base_url)
        .expect("client construction should not fail")
}

fn explore_body(token: &str) -> String {
    let json = serde_json::json!({
        "widgets": [
            { "id": "GEO_MAP", "token": "geo-token", "request": {} },
            {
                "id": "TIMESERIES",
                "token": token,
                "request": { "time": "now 7-d", "resolution": "HOUR" }
            }
        ]
    });
    format!(")]}}'\n{json}")
}

fn multiline_body(rows: &[&[i64]]) -> String {
    let timeline: Vec<serde_json::Value> = rows
        .iter()
        .map(|values| serde_json::json!({ "time": "1767225600", "value": values }))
        .collect();
    let json = serde_json::json!({ "default": { "timelineData": timeline } });
    format!(")]}}',\n{json}")
}

async fn mount_batch(server: &MockServer, marker: &'static str, token: &'static str, rows: &[&[i64]]) {
    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .and(ReqMentions(marker))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body(token)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trends/api/widgetdata/multiline"))
        .and(query_param("token", token))
        .respond_with(ResponseTemplate::new(200).set_body_string(multiline_body(rows)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn interest_for_batch_summarises_each_series() {
    let server = MockServer::start().await;
    mount_batch(
        &server,
        "content marketing",
        "tok-1",
        &[&[10, 40], &[20, 30], &[25, 20]],
    )
    .await;

    let client = test_client(&server.uri());
    let keywords = vec!["content marketing".to_string(), "seo".to_string()];
    let observations = client
        .interest_for_batch(&keywords)
        .await
        .expect("batch should parse");

    assert_eq!(observations.len(), 2);

    let first = &observations[0];
    assert_eq!(first.keyword, "content marketing");
    assert_eq!(first.platform, Platform::GoogleTrends);
    assert_eq!(first.volume, 18);
    assert_eq!(first.metadata["max_interest"], 25);
    assert_eq!(first.metadata["trend_direction"], "rising");

    let second = &observations[1];
    assert_eq!(second.keyword, "seo");
    assert_eq!(second.volume, 30);
    assert_eq!(second.metadata["max_interest"], 40);
    assert_eq!(second.metadata["trend_direction"], "falling");
}

#[tokio::test]
async fn keyword_without_series_is_skipped() {
    let server = MockServer::start().await;
    mount_batch(&server, "email marketing", "tok-2", &[&[5], &[7]]).await;

    let client = test_client(&server.uri());
    let keywords = vec!["email marketing".to_string(), "ppc".to_string()];
    let observations = client.interest_for_batch(&keywords).await.unwrap();

    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].keyword, "email marketing");
    assert_eq!(observations[0].volume, 6);
}

#[tokio::test]
async fn rate_limited_explore_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .interest_for_batch(&["seo".to_string()])
        .await
        .expect_err("429 should fail the batch");
    assert!(err.to_string().contains("429"), "unexpected error: {err}");
}

#[tokio::test]
async fn failing_batch_does_not_abort_remaining_batches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .and(ReqMentions("kw-a1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_batch(&server, "kw-b1", "tok-b", &[&[3], &[9]]).await;

    let keywords: Vec<String> = ["kw-a1", "kw-a2", "kw-a3", "kw-a4", "kw-a5", "kw-b1"]
        .iter()
        .map(|k| (*k).to_string())
        .collect();
    let source = GoogleTrendsSource::new(test_client(&server.uri()), keywords, Duration::ZERO);

    let collection = source.collect().await;
    assert_eq!(collection.calls_failed, 1);
    assert_eq!(collection.calls_succeeded, 1);
    assert!(!collection.all_failed());
    assert_eq!(collection.observations.len(), 1);
    assert_eq!(collection.observations[0].keyword, "kw-b1");
    assert_eq!(collection.observations[0].volume, 6);
}

#[tokio::test]
async fn every_batch_failing_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let keywords: Vec<String> = (0..7).map(|i| format!("kw{i}")).collect();
    let source = GoogleTrendsSource::new(test_client(&server.uri()), keywords, Duration::ZERO);

    let collection = source.collect().await;
    assert_eq!(collection.calls_failed, 2);
    assert!(collection.all_failed());
    assert!(collection.observations.is_empty());
}
