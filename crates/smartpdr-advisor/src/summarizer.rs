use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("no API key configured for the summarization service")]
    MissingCredential,

    #[error("summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("summarization service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("summarization service returned no text")]
    EmptyResponse,

    #[error("unexpected summarization payload: {0}")]
    Decode(String),
}

/// Black-box text generation: prompt in, prose out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, SummaryError>;
}
