use std::path::PathBuf;

use crate::app_config::{AppConfig, RedditCredentials};
use crate::ConfigError;

/// Marketing keywords polled from the search-interest source when
/// `TRENDWATCH_KEYWORDS` is not set.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "digital marketing",
    "social media marketing",
    "content marketing",
    "SEO",
    "SEM",
    "email marketing",
    "influencer marketing",
    "brand awareness",
    "lead generation",
    "conversion rate",
    "marketing automation",
    "analytics",
    "engagement",
    "viral marketing",
    "growth hacking",
    "marketing strategy",
    "customer acquisition",
    "retention",
    "ROI",
    "KPI",
];

/// Subreddits read by the social source when `TRENDWATCH_SUBREDDITS` is not set.
pub const DEFAULT_SUBREDDITS: &[&str] = &[
    "marketing",
    "digital_marketing",
    "SEO",
    "socialmedia",
    "content_marketing",
];

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or a dependent variable is missing.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or a dependent variable is missing.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a compiled-in default, so an empty environment yields a
/// usable configuration with sentiment scoring and the Reddit source disabled.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_list = |var: &str, defaults: &[&str]| -> Result<Vec<String>, ConfigError> {
        match optional(var) {
            None => Ok(defaults.iter().map(|s| (*s).to_string()).collect()),
            Some(raw) => {
                let items = split_list(&raw);
                if items.is_empty() {
                    return Err(ConfigError::InvalidEnvVar {
                        var: var.to_string(),
                        reason: "list must contain at least one non-empty entry".to_string(),
                    });
                }
                Ok(items)
            }
        }
    };

    let database_path = PathBuf::from(or_default(
        "TRENDWATCH_DATABASE_PATH",
        "trends_database.db",
    ));
    let log_level = or_default("TRENDWATCH_LOG_LEVEL", "info");
    let reports_dir = PathBuf::from(or_default("TRENDWATCH_REPORTS_DIR", "reports"));
    let charts_dir = PathBuf::from(or_default("TRENDWATCH_CHARTS_DIR", "charts"));
    let categories_path = optional("TRENDWATCH_CATEGORIES_PATH").map(PathBuf::from);

    let keywords = parse_list("TRENDWATCH_KEYWORDS", DEFAULT_KEYWORDS)?;
    let subreddits = parse_list("TRENDWATCH_SUBREDDITS", DEFAULT_SUBREDDITS)?;

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("TRENDWATCH_GEMINI_MODEL", "gemini-pro");

    let reddit = match (optional("REDDIT_CLIENT_ID"), optional("REDDIT_CLIENT_SECRET")) {
        (Some(client_id), Some(client_secret)) => Some(RedditCredentials {
            client_id,
            client_secret,
        }),
        (Some(_), None) => {
            return Err(ConfigError::MissingEnvVar(
                "REDDIT_CLIENT_SECRET".to_string(),
            ))
        }
        (None, Some(_)) => return Err(ConfigError::MissingEnvVar("REDDIT_CLIENT_ID".to_string())),
        (None, None) => None,
    };
    let reddit_user_agent = or_default("REDDIT_USER_AGENT", "TrendExtractor/1.0");

    let request_timeout_secs = parse_u64("TRENDWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let trends_timeframe = or_default("TRENDWATCH_TRENDS_TIMEFRAME", "now 7-d");
    let trends_geo = or_default("TRENDWATCH_TRENDS_GEO", "US");
    let reddit_post_limit = parse_u32("TRENDWATCH_REDDIT_POST_LIMIT", "50")?;
    let trends_delay_ms = parse_u64("TRENDWATCH_TRENDS_DELAY_MS", "2000")?;
    let reddit_delay_ms = parse_u64("TRENDWATCH_REDDIT_DELAY_MS", "1000")?;
    let sentiment_delay_ms = parse_u64("TRENDWATCH_SENTIMENT_DELAY_MS", "500")?;

    Ok(AppConfig {
        database_path,
        log_level,
        reports_dir,
        charts_dir,
        categories_path,
        keywords,
        subreddits,
        gemini_api_key,
        gemini_model,
        reddit,
        reddit_user_agent,
        request_timeout_secs,
        trends_timeframe,
        trends_geo,
        reddit_post_limit,
        trends_delay_ms,
        reddit_delay_ms,
        sentiment_delay_ms,
    })
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
