//! Search-interest collector backed by the Google Trends widget API.
//!
//! Interest is fetched in two steps: `explore` returns a token for the
//! interest-over-time widget, `widgetdata/multiline` returns the series.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use trendwatch_core::{Observation, Platform};

use crate::error::SourceError;
use crate::timeline::{
    parse_payload, series_for, summarize_series, timeseries_widget, ExploreResponse,
    MultilineResponse,
};
use crate::{pause, Collection, TrendSource};

const DEFAULT_BASE_URL: &str = "https://trends.google.com/";
const HOST_LANGUAGE: &str = "en-US";
const TZ_OFFSET_MINUTES: &str = "360";

/// Upstream limit on keywords compared in one request.
pub const MAX_KEYWORDS_PER_BATCH: usize = 5;

/// Client for the Google Trends widget API.
pub struct GoogleTrendsClient {
    client: Client,
    base_url: Url,
    timeframe: String,
    geo: String,
}

impl GoogleTrendsClient {
    /// Creates a client pointed at the production Google Trends host.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, timeframe: &str, geo: &str) -> Result<Self, SourceError> {
        Self::with_base_url(timeout_secs, timeframe, geo, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be built, or
    /// [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        timeframe: &str,
        geo: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        // The widget endpoints answer 429 without the NID cookie handed out
        // by the explore page, so keep a cookie jar.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .cookie_store(true)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            timeframe: timeframe.to_string(),
            geo: geo.to_string(),
        })
    }

    /// Visit the explore page once so the cookie jar holds a session cookie.
    ///
    /// Failure is logged and ignored; the data endpoints may still answer.
    pub async fn warm_up(&self) {
        let url = self.endpoint("trends/explore", &[("geo", self.geo.as_str())]);
        match self.client.get(url).send().await {
            Ok(resp) => tracing::debug!(status = %resp.status(), "google trends session primed"),
            Err(e) => tracing::debug!(error = %e, "google trends warm-up failed"),
        }
    }

    /// Fetch interest over time for up to [`MAX_KEYWORDS_PER_BATCH`] keywords.
    ///
    /// Keywords absent from the returned series produce no observation.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SourceError::Deserialize`] / [`SourceError::UnexpectedPayload`] if
    ///   a response does not have the expected shape.
    pub async fn interest_for_batch(
        &self,
        keywords: &[String],
    ) -> Result<Vec<Observation>, SourceError> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }
        if keywords.len() > MAX_KEYWORDS_PER_BATCH {
            return Err(SourceError::UnexpectedPayload(format!(
                "batch of {} exceeds {MAX_KEYWORDS_PER_BATCH} keywords",
                keywords.len()
            )));
        }

        let explore_req = serde_json::json!({
            "comparisonItem": keywords
                .iter()
                .map(|k| serde_json::json!({
                    "keyword": k,
                    "time": self.timeframe,
                    "geo": self.geo,
                }))
                .collect::<Vec<_>>(),
            "category": 0,
            "property": "",
        });

        let explore_req = explore_req.to_string();
        let url = self.endpoint(
            "trends/api/explore",
            &[
                ("hl", HOST_LANGUAGE),
                ("tz", TZ_OFFSET_MINUTES),
                ("req", explore_req.as_str()),
            ],
        );
        let body = self.get_text(url, "explore").await?;
        let explore: ExploreResponse = parse_payload(&body, "explore")?;
        let (token, widget_request) = timeseries_widget(explore)?;

        let widget_request = widget_request.to_string();
        let url = self.endpoint(
            "trends/api/widgetdata/multiline",
            &[
                ("hl", HOST_LANGUAGE),
                ("tz", TZ_OFFSET_MINUTES),
                ("req", widget_request.as_str()),
                ("token", token.as_str()),
            ],
        );
        let body = self.get_text(url, "multiline").await?;
        let multiline: MultilineResponse = parse_payload(&body, "multiline")?;
        let points = multiline.default.timeline_data;

        let observations = keywords
            .iter()
            .enumerate()
            .filter_map(|(index, keyword)| {
                let summary = summarize_series(&series_for(&points, index))?;
                let direction = if summary.rising { "rising" } else { "falling" };
                Some(
                    Observation::new(keyword.clone(), Platform::GoogleTrends, summary.mean)
                        .with_metadata(serde_json::json!({
                            "max_interest": summary.max,
                            "trend_direction": direction,
                        })),
                )
            })
            .collect();

        Ok(observations)
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn get_text(&self, url: Url, context: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Polls a fixed keyword list in batches of [`MAX_KEYWORDS_PER_BATCH`].
pub struct GoogleTrendsSource {
    client: GoogleTrendsClient,
    keywords: Vec<String>,
    delay: Duration,
}

impl GoogleTrendsSource {
    #[must_use]
    pub fn new(client: GoogleTrendsClient, keywords: Vec<String>, delay: Duration) -> Self {
        Self {
            client,
            keywords,
            delay,
        }
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsSource {
    fn name(&self) -> &'static str {
        "google_trends"
    }

    async fn collect(&self) -> Collection {
        let mut collection = Collection::default();
        if self.keywords.is_empty() {
            return collection;
        }

        self.client.warm_up().await;

        for (i, batch) in self.keywords.chunks(MAX_KEYWORDS_PER_BATCH).enumerate() {
            if i > 0 {
                pause(self.delay).await;
            }

            match self.client.interest_for_batch(batch).await {
                Ok(observations) => {
                    tracing::debug!(
                        source = self.name(),
                        batch = ?batch,
                        count = observations.len(),
                        "collected search-interest batch"
                    );
                    collection.observations.extend(observations);
                    collection.calls_succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        source = self.name(),
                        batch = ?batch,
                        error = %e,
                        "search-interest batch failed"
                    );
                    collection.calls_failed += 1;
                }
            }
        }

        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GoogleTrendsClient {
        GoogleTrendsClient::with_base_url(30, "now 7-d", "US", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_encodes_json_request() {
        let client = test_client("https://trends.google.com");
        let url = client.endpoint("trends/api/explore", &[("req", "{\"a\":\"b c\"}")]);
        assert!(url.as_str().starts_with("https://trends.google.com/trends/api/explore?req="));
        assert!(!url.as_str().contains(' '), "query must be encoded: {url}");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = test_client("http://127.0.0.1:9999/");
        let url = client.endpoint("trends/explore", &[("geo", "US")]);
        assert_eq!(url.as_str(), "http://127.0.0.1:9999/trends/explore?geo=US");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GoogleTrendsClient::with_base_url(30, "now 7-d", "US", "not a url");
        assert!(matches!(result, Err(SourceError::InvalidBaseUrl { .. })));
    }
}
