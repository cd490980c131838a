use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::categorizer::DEFAULT_CATEGORY;

/// Sentiment above this value is labelled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.3;
/// Sentiment below this value is labelled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "Google Trends")]
    GoogleTrends,
    Reddit,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::GoogleTrends => "Google Trends",
            Platform::Reddit => "Reddit",
        }
    }

    /// Whether items from this platform carry their own engagement signal.
    ///
    /// Platforms that do not have their engagement back-filled from volume.
    #[must_use]
    pub fn reports_engagement(self) -> bool {
        matches!(self, Platform::Reddit)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown platform: {0}")]
pub struct PlatformParseError(pub String);

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Google Trends" => Ok(Platform::GoogleTrends),
            "Reddit" => Ok(Platform::Reddit),
            other => Err(PlatformParseError(other.to_string())),
        }
    }
}

/// One trend record from a single platform at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub keyword: String,
    pub platform: Platform,
    pub category: String,
    pub volume: i64,
    /// In `[-1.0, 1.0]`.
    pub sentiment_score: f64,
    pub engagement_score: f64,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific JSON object.
    pub metadata: serde_json::Value,
}

impl Observation {
    /// Create an observation stamped with the current time. Category,
    /// sentiment and engagement start at their defaults.
    #[must_use]
    pub fn new(keyword: impl Into<String>, platform: Platform, volume: i64) -> Self {
        Self {
            keyword: keyword.into(),
            platform,
            category: DEFAULT_CATEGORY.to_string(),
            volume,
            sentiment_score: 0.0,
            engagement_score: 0.0,
            timestamp: Utc::now(),
            metadata: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    #[must_use]
    pub fn with_engagement(mut self, engagement_score: f64) -> Self {
        self.engagement_score = engagement_score;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Volume plus engagement: the ranking key for reports and summaries.
    #[must_use]
    pub fn combined_score(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let volume = self.volume as f64;
        volume + self.engagement_score
    }

    /// Copy volume into engagement for platforms without their own signal.
    pub fn backfill_engagement(&mut self) {
        if !self.platform.reports_engagement() {
            #[allow(clippy::cast_precision_loss)]
            let volume = self.volume as f64;
            self.engagement_score = volume;
        }
    }
}

/// Human-readable bucket for a sentiment score.
#[must_use]
pub fn sentiment_label(score: f64) -> &'static str {
    if score > POSITIVE_THRESHOLD {
        "Positive"
    } else if score < NEGATIVE_THRESHOLD {
        "Negative"
    } else {
        "Neutral"
    }
}
