//! Shared domain types and configuration for trendwatch.

pub mod app_config;
pub mod categories;
pub mod categorizer;
pub mod config;
pub mod observation;
pub mod summary;

use thiserror::Error;

pub use app_config::{AppConfig, RedditCredentials};
pub use categories::{default_categories, load_categories, CategoryRule};
pub use categorizer::{Categorizer, DEFAULT_CATEGORY};
pub use config::{
    load_app_config, load_app_config_from_env, DEFAULT_KEYWORDS, DEFAULT_SUBREDDITS,
};
pub use observation::{sentiment_label, Observation, Platform, PlatformParseError};
pub use summary::{summarize_keywords, KeywordSummary};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[from] serde_yaml::Error),

    #[error("categories validation failed: {0}")]
    Validation(String),
}
