use std::path::PathBuf;

/// Credentials for the Reddit OAuth client-credentials flow.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    pub reports_dir: PathBuf,
    pub charts_dir: PathBuf,
    pub categories_path: Option<PathBuf>,
    pub keywords: Vec<String>,
    pub subreddits: Vec<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub reddit: Option<RedditCredentials>,
    pub reddit_user_agent: String,
    pub request_timeout_secs: u64,
    pub trends_timeframe: String,
    pub trends_geo: String,
    pub reddit_post_limit: u32,
    pub trends_delay_ms: u64,
    pub reddit_delay_ms: u64,
    pub sentiment_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_path", &self.database_path)
            .field("log_level", &self.log_level)
            .field("reports_dir", &self.reports_dir)
            .field("charts_dir", &self.charts_dir)
            .field("categories_path", &self.categories_path)
            .field("keywords", &self.keywords.len())
            .field("subreddits", &self.subreddits)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("reddit", &self.reddit)
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("trends_timeframe", &self.trends_timeframe)
            .field("trends_geo", &self.trends_geo)
            .field("reddit_post_limit", &self.reddit_post_limit)
            .field("trends_delay_ms", &self.trends_delay_ms)
            .field("reddit_delay_ms", &self.reddit_delay_ms)
            .field("sentiment_delay_ms", &self.sentiment_delay_ms)
            .finish()
    }
}
