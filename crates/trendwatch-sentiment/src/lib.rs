//! Sentiment scoring for trendwatch.
//!
//! Text is scored by a hosted language model that is asked for a single
//! number in `[-1, 1]`. Scoring never fails from the caller's point of view:
//! any upstream problem is logged and the text scores neutral (`0.0`).

pub mod error;
pub mod gemini;
pub mod scorer;

pub use error::SentimentError;
pub use gemini::GeminiScorer;
pub use scorer::{parse_score, score_batch, NeutralScorer, SentimentScorer, MAX_INPUT_CHARS};
