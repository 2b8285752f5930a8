pub mod advisor;
pub mod client;
pub mod summarizer;

pub use advisor::{
    AdvisorError, FALLBACK_DISABLED, FALLBACK_EMPTY, FALLBACK_UNAVAILABLE, StrategyAdvisor,
    StrategyReport, SummaryItem, render_prompt,
};
pub use client::{GenerativeTextClient, GenerativeTextConfig};
pub use summarizer::{Summarizer, SummaryError};
