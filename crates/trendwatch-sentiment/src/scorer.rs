//! The scoring capability and the helpers shared by its implementations.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

/// Only this many leading characters of a text are submitted.
pub const MAX_INPUT_CHARS: usize = 500;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("valid regex"));

/// Something that can put a sentiment score on a piece of text.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Score `text` in `[-1.0, 1.0]`. Implementations return `0.0` instead of
    /// failing.
    async fn score(&self, text: &str) -> f64;
}

/// Scorer used when no model is configured. Everything is neutral.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralScorer;

#[async_trait]
impl SentimentScorer for NeutralScorer {
    async fn score(&self, _text: &str) -> f64 {
        0.0
    }
}

/// Score each text in order, sleeping `delay` after every call.
pub async fn score_batch<S>(scorer: &S, texts: &[String], delay: Duration) -> Vec<f64>
where
    S: SentimentScorer + ?Sized,
{
    let mut scores = Vec::with_capacity(texts.len());
    for text in texts {
        scores.push(scorer.score(text).await);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    scores
}

/// First numeric token in a model reply, clamped to `[-1.0, 1.0]`.
#[must_use]
pub fn parse_score(reply: &str) -> Option<f64> {
    let token = NUMBER_RE.find(reply.trim())?;
    let value: f64 = token.as_str().parse().ok()?;
    Some(value.clamp(-1.0, 1.0))
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub(crate) fn build_prompt(text: &str) -> String {
    format!(
        "Analyze the sentiment of the following text and provide a sentiment score \
         between -1 (very negative) and 1 (very positive).\n\
         Return ONLY a number between -1 and 1, nothing else.\n\n\
         Text: {}",
        truncate_chars(text, MAX_INPUT_CHARS)
    )
}
