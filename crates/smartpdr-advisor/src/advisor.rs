//! Strategy summaries over the highest-risk SKUs.
//!
//! The advisor never surfaces summarization failures: every error becomes a
//! fixed fallback text, flagged as such in the report.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smartpdr_core::ClassifiedInventoryRecord;
use thiserror::Error;
use tracing::{info, warn};

use crate::summarizer::{Summarizer, SummaryError};

pub const FALLBACK_DISABLED: &str =
    "AI analysis is disabled: no API key is configured for the summarization service.";
pub const FALLBACK_UNAVAILABLE: &str =
    "The strategic analysis could not be generated right now. Please try again later.";
pub const FALLBACK_EMPTY: &str = "Analysis not available at this time.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("a strategy analysis is already running")]
    Busy,
}

/// Compact view of one SKU sent to the summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    pub sku: String,
    pub name: String,
    pub stock: Decimal,
    pub reorder_point: Decimal,
    pub monthly_demand: Decimal,
    pub aging_days: i64,
}

impl From<&ClassifiedInventoryRecord> for SummaryItem {
    fn from(record: &ClassifiedInventoryRecord) -> Self {
        Self {
            sku: record.id().to_string(),
            name: record.name().to_string(),
            stock: record.current_stock(),
            reorder_point: record.reorder_point,
            monthly_demand: record.monthly_demand.ceil(),
            aging_days: record.aging_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub text: String,
    /// True when `text` is a fallback rather than generated analysis.
    pub fallback: bool,
    pub items_analyzed: Vec<SummaryItem>,
    pub generated_at: DateTime<Utc>,
}

pub struct StrategyAdvisor {
    summarizer: Arc<dyn Summarizer>,
    top_n: usize,
    in_flight: AtomicBool,
}

impl StrategyAdvisor {
    pub fn new(summarizer: Arc<dyn Summarizer>, top_n: usize) -> Self {
        Self {
            summarizer,
            top_n: top_n.max(1),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Project the leading `top_n` records; `records` is expected in ranking order.
    pub fn project(&self, records: &[ClassifiedInventoryRecord]) -> Vec<SummaryItem> {
        records.iter().take(self.top_n).map(SummaryItem::from).collect()
    }

    /// Run one analysis. Refuses with `Busy` while another is outstanding.
    pub async fn analyze(
        &self,
        records: &[ClassifiedInventoryRecord],
    ) -> Result<StrategyReport, AdvisorError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(AdvisorError::Busy)?;

        let items = self.project(records);
        let prompt = render_prompt(&items);
        let (text, fallback) = match self.summarizer.summarize(&prompt).await {
            Ok(text) if text.trim().is_empty() => (FALLBACK_EMPTY.to_string(), true),
            Ok(text) => (text, false),
            Err(err) => {
                warn!("strategy analysis unavailable: {err}");
                (fallback_text(&err).to_string(), true)
            }
        };
        info!(items = items.len(), fallback, "strategy analysis finished");

        Ok(StrategyReport {
            text,
            fallback,
            items_analyzed: items,
            generated_at: Utc::now(),
        })
    }
}

pub fn fallback_text(err: &SummaryError) -> &'static str {
    match err {
        SummaryError::MissingCredential => FALLBACK_DISABLED,
        SummaryError::EmptyResponse => FALLBACK_EMPTY,
        _ => FALLBACK_UNAVAILABLE,
    }
}

pub fn render_prompt(items: &[SummaryItem]) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                "- {} (SKU: {}): current stock {}, reorder point {}, \
                 monthly demand {}, aging {} days.",
                item.name,
                item.sku,
                item.stock.normalize(),
                item.reorder_point.normalize(),
                item.monthly_demand.normalize(),
                item.aging_days
            )
        })
        .collect();

    format!(
        "Act as a supply chain consultant specialized in the PDR model \
         (reorder Point, monthly Demand, safety Reserve).\n\
         Analyze the following {} inventory items that need the most attention:\n\n\
         {}\n\n\
         Write a concise executive report (at most 150 words) that:\n\
         1. Identifies imminent stock-out risks.\n\
         2. Flags dead stock (high aging).\n\
         3. Suggests one priority action to improve cash flow.",
        items.len(),
        lines.join("\n")
    )
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
