//! Keyword-level summary across platforms.

use std::collections::HashMap;

use serde::Serialize;

use crate::observation::{Observation, Platform};

/// Aggregated view of every observation sharing one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordSummary {
    pub keyword: String,
    /// Distinct platforms, in first-seen order.
    pub platforms: Vec<Platform>,
    /// Distinct categories, in first-seen order.
    pub categories: Vec<String>,
    pub total_volume: i64,
    pub total_engagement: f64,
    pub avg_sentiment: f64,
    pub occurrences: usize,
    pub combined_score: f64,
}

#[derive(Default)]
struct Accumulator {
    platforms: Vec<Platform>,
    categories: Vec<String>,
    total_volume: i64,
    total_engagement: f64,
    sentiment_scores: Vec<f64>,
}

/// Fold observations into one summary per keyword, highest combined score
/// first, keeping at most `top_n`.
#[must_use]
pub fn summarize_keywords(observations: &[Observation], top_n: usize) -> Vec<KeywordSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Accumulator> = HashMap::new();

    for obs in observations {
        let acc = groups.entry(obs.keyword.as_str()).or_insert_with(|| {
            order.push(obs.keyword.as_str());
            Accumulator::default()
        });

        if !acc.platforms.contains(&obs.platform) {
            acc.platforms.push(obs.platform);
        }
        if !acc.categories.contains(&obs.category) {
            acc.categories.push(obs.category.clone());
        }
        acc.total_volume = acc.total_volume.saturating_add(obs.volume);
        acc.total_engagement += obs.engagement_score;
        acc.sentiment_scores.push(obs.sentiment_score);
    }

    let mut summaries: Vec<KeywordSummary> = order
        .into_iter()
        .filter_map(|keyword| {
            let acc = groups.remove(keyword)?;
            let occurrences = acc.sentiment_scores.len();
            #[allow(clippy::cast_precision_loss)]
            let avg_sentiment = if occurrences == 0 {
                0.0
            } else {
                acc.sentiment_scores.iter().sum::<f64>() / occurrences as f64
            };
            #[allow(clippy::cast_precision_loss)]
            let combined_score = acc.total_volume as f64 + acc.total_engagement;

            Some(KeywordSummary {
                keyword: keyword.to_string(),
                platforms: acc.platforms,
                categories: acc.categories,
                total_volume: acc.total_volume,
                total_engagement: acc.total_engagement,
                avg_sentiment,
                occurrences,
                combined_score,
            })
        })
        .collect();

    // Stable sort: equal scores keep first-seen order.
    summaries.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    summaries.truncate(top_n);
    summaries
}
