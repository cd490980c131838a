//! Reddit hot-post collector (client-credentials OAuth).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use trendwatch_core::{Observation, Platform, RedditCredentials};

use crate::error::SourceError;
use crate::{pause, Collection, TrendSource};

const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit listing wrapper.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    permalink: Option<String>,
    #[serde(default)]
    upvote_ratio: f64,
}

/// Reddit API client.
///
/// The bearer token is fetched per call to [`RedditClient::fetch_token`];
/// callers hold on to it for the duration of a collection pass.
pub struct RedditClient {
    client: reqwest::Client,
    credentials: RedditCredentials,
    user_agent: String,
    auth_base: String,
    api_base: String,
}

impl RedditClient {
    /// Create a client for the production Reddit hosts.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: RedditCredentials,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, SourceError> {
        Self::with_base_urls(
            credentials,
            user_agent,
            timeout_secs,
            DEFAULT_AUTH_BASE,
            DEFAULT_API_BASE,
        )
    }

    /// Create a client with custom token and API hosts (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_base_urls(
        credentials: RedditCredentials,
        user_agent: &str,
        timeout_secs: u64,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, SourceError> {
        // oauth.reddit.com sometimes blocks rustls via TLS fingerprinting.
        // If rejected, enable `native-tls` on reqwest and call `.use_native_tls()`.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            credentials,
            user_agent: user_agent.to_string(),
            auth_base: auth_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Exchange the client credentials for an application-only bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Auth`] on a non-2xx response or an unparsable
    /// token body, [`SourceError::Http`] on network failure.
    pub async fn fetch_token(&self) -> Result<String, SourceError> {
        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .header("User-Agent", &self.user_agent)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Auth(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token_resp: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Auth(format!("token parse error: {e}")))?;

        Ok(token_resp.access_token)
    }

    /// Fetch up to `limit` posts from the hot listing of `subreddit`.
    ///
    /// Posts without a title are skipped.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SourceError::Deserialize`] if the listing does not parse.
    pub async fn hot_posts(
        &self,
        token: &str,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<Observation>, SourceError> {
        let response = self
            .client
            .get(format!("{}/r/{subreddit}/hot", self.api_base))
            .header("Authorization", format!("Bearer {token}"))
            .header("User-Agent", &self.user_agent)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                context: format!("r/{subreddit}/hot"),
            });
        }

        let body = response.text().await?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: format!("r/{subreddit}/hot"),
                source: e,
            })?;

        Ok(listing
            .data
            .children
            .into_iter()
            .filter_map(|post| post_to_observation(post.data, subreddit))
            .collect())
    }
}

fn post_to_observation(post: PostData, subreddit: &str) -> Option<Observation> {
    let title = post
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())?
        .to_string();
    let url = post
        .permalink
        .map(|p| format!("https://reddit.com{p}"))
        .unwrap_or_default();

    #[allow(clippy::cast_precision_loss)]
    let engagement = (post.score + post.num_comments) as f64;

    Some(
        Observation::new(title, Platform::Reddit, post.score)
            .with_engagement(engagement)
            .with_metadata(serde_json::json!({
                "subreddit": subreddit,
                "url": url,
                "comments": post.num_comments,
                "upvote_ratio": post.upvote_ratio,
            })),
    )
}

/// Polls the hot listing of each configured subreddit.
pub struct RedditSource {
    client: RedditClient,
    subreddits: Vec<String>,
    post_limit: u32,
    delay: Duration,
}

impl RedditSource {
    #[must_use]
    pub fn new(
        client: RedditClient,
        subreddits: Vec<String>,
        post_limit: u32,
        delay: Duration,
    ) -> Self {
        Self {
            client,
            subreddits,
            post_limit,
            delay,
        }
    }
}

#[async_trait]
impl TrendSource for RedditSource {
    fn name(&self) -> &'static str {
        "reddit"
    }

    async fn collect(&self) -> Collection {
        let mut collection = Collection::default();
        if self.subreddits.is_empty() {
            return collection;
        }

        let token = match self.client.fetch_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(source = self.name(), error = %e, "reddit authentication failed");
                collection.calls_failed = self.subreddits.len();
                return collection;
            }
        };

        for (i, subreddit) in self.subreddits.iter().enumerate() {
            if i > 0 {
                pause(self.delay).await;
            }

            match self
                .client
                .hot_posts(&token, subreddit, self.post_limit)
                .await
            {
                Ok(observations) => {
                    tracing::debug!(
                        source = self.name(),
                        subreddit = %subreddit,
                        count = observations.len(),
                        "collected hot posts"
                    );
                    collection.observations.extend(observations);
                    collection.calls_succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        source = self.name(),
                        subreddit = %subreddit,
                        error = %e,
                        "subreddit fetch failed"
                    );
                    collection.calls_failed += 1;
                }
            }
        }

        collection
    }
}
