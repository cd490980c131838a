use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to parse model response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("model response contained no text")]
    EmptyResponse,

    #[error("no numeric score in model reply: {0:?}")]
    NoScore(String),
}
