use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.database_path, PathBuf::from("trends_database.db"));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.reports_dir, PathBuf::from("reports"));
    assert_eq!(cfg.charts_dir, PathBuf::from("charts"));
    assert!(cfg.categories_path.is_none());
    assert_eq!(cfg.keywords.len(), DEFAULT_KEYWORDS.len());
    assert_eq!(cfg.subreddits.len(), DEFAULT_SUBREDDITS.len());
    assert!(cfg.gemini_api_key.is_none());
    assert_eq!(cfg.gemini_model, "gemini-pro");
    assert!(cfg.reddit.is_none());
    assert_eq!(cfg.reddit_user_agent, "TrendExtractor/1.0");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.trends_timeframe, "now 7-d");
    assert_eq!(cfg.trends_geo, "US");
    assert_eq!(cfg.reddit_post_limit, 50);
    assert_eq!(cfg.trends_delay_ms, 2000);
    assert_eq!(cfg.reddit_delay_ms, 1000);
    assert_eq!(cfg.sentiment_delay_ms, 500);
}

#[test]
fn keyword_list_override_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_KEYWORDS", " growth hacking , ,SEO ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.keywords, vec!["growth hacking", "SEO"]);
}

#[test]
fn keyword_list_of_only_separators_is_rejected() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_KEYWORDS", " , ,");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDWATCH_KEYWORDS"),
        "expected InvalidEnvVar(TRENDWATCH_KEYWORDS), got: {result:?}"
    );
}

#[test]
fn blank_value_falls_back_to_default() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_LOG_LEVEL", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn reddit_credentials_require_both_halves() {
    let mut map = HashMap::new();
    map.insert("REDDIT_CLIENT_ID", "id");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REDDIT_CLIENT_SECRET"),
        "expected MissingEnvVar(REDDIT_CLIENT_SECRET), got: {result:?}"
    );

    let mut map = HashMap::new();
    map.insert("REDDIT_CLIENT_SECRET", "secret");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REDDIT_CLIENT_ID"),
        "expected MissingEnvVar(REDDIT_CLIENT_ID), got: {result:?}"
    );
}

#[test]
fn reddit_credentials_are_parsed_and_redacted_in_debug() {
    let mut map = HashMap::new();
    map.insert("REDDIT_CLIENT_ID", "id-123");
    map.insert("REDDIT_CLIENT_SECRET", "very-secret");
    map.insert("GEMINI_API_KEY", "gemini-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    let reddit = cfg.reddit.as_ref().expect("reddit credentials");
    assert_eq!(reddit.client_id, "id-123");
    assert_eq!(reddit.client_secret, "very-secret");

    let debug = format!("{cfg:?}");
    assert!(!debug.contains("very-secret"), "secret leaked: {debug}");
    assert!(!debug.contains("gemini-secret"), "api key leaked: {debug}");
    assert!(debug.contains("[redacted]"));
}

#[test]
fn reddit_post_limit_override() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_REDDIT_POST_LIMIT", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.reddit_post_limit, 25);
}

#[test]
fn reddit_post_limit_invalid() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_REDDIT_POST_LIMIT", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDWATCH_REDDIT_POST_LIMIT"),
        "expected InvalidEnvVar(TRENDWATCH_REDDIT_POST_LIMIT), got: {result:?}"
    );
}

#[test]
fn sentiment_delay_override() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_SENTIMENT_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.sentiment_delay_ms, 0);
}

#[test]
fn trends_delay_invalid() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_TRENDS_DELAY_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDWATCH_TRENDS_DELAY_MS"),
        "expected InvalidEnvVar(TRENDWATCH_TRENDS_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDWATCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TRENDWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn categories_path_is_optional() {
    let mut map = HashMap::new();
    map.insert("TRENDWATCH_CATEGORIES_PATH", "./config/categories.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.categories_path,
        Some(PathBuf::from("./config/categories.yaml"))
    );
}
