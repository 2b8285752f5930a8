use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smartpdr_advisor::{StrategyReport, SummaryItem};
use smartpdr_core::{ClassifiedInventoryRecord, Criticality, LoadEvent, Priority};
use smartpdr_engine::{DashboardStats, InventoryFilter, SortDirection, SortKey, SortOrder};

/// Display string for a priority. Only used when rendering responses.
pub fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "Reorder Point",
        Priority::Warning => "Alert",
        Priority::Healthy => "Healthy",
    }
}

fn parse_priority(value: &str) -> Result<Option<Priority>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    [Priority::Critical, Priority::Warning, Priority::Healthy]
        .into_iter()
        .find(|priority| {
            value.eq_ignore_ascii_case(priority_label(*priority))
                || value.eq_ignore_ascii_case(priority_code(*priority))
        })
        .map(Some)
        .ok_or_else(|| format!("unknown priority {value:?}"))
}

fn priority_code(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "CRITICAL",
        Priority::Warning => "WARNING",
        Priority::Healthy => "HEALTHY",
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

impl InventoryQuery {
    /// `All` (any case) or an empty value disables a filter.
    pub fn filter(&self) -> Result<InventoryFilter, String> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .map(str::to_string);
        let priority = match self.priority.as_deref() {
            Some(value) => parse_priority(value)?,
            None => None,
        };
        Ok(InventoryFilter {
            search: self.search.clone(),
            category,
            priority,
        })
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.sort.map(|key| SortOrder {
            key,
            direction: self.direction.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRow {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub criticality: Criticality,
    pub current_stock: Decimal,
    pub monthly_demand: Decimal,
    pub safety_reserve: Decimal,
    pub reorder_point: Decimal,
    pub target_stock: Decimal,
    pub stock_gap: Decimal,
    pub aging_days: i64,
    pub priority: Priority,
    pub priority_label: String,
    pub priority_score: u32,
}

impl From<&ClassifiedInventoryRecord> for InventoryRow {
    fn from(record: &ClassifiedInventoryRecord) -> Self {
        Self {
            sku: record.id().to_string(),
            name: record.name().to_string(),
            category: record.category().to_string(),
            criticality: record.record.criticality,
            current_stock: record.current_stock(),
            monthly_demand: record.monthly_demand,
            safety_reserve: record.safety_reserve,
            reorder_point: record.reorder_point,
            target_stock: record.target_stock,
            stock_gap: record.stock_gap,
            aging_days: record.aging_days,
            priority: record.priority,
            priority_label: priority_label(record.priority).to_string(),
            priority_score: record.priority_score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryListResponse {
    pub total: usize,
    pub matched: usize,
    pub items: Vec<InventoryRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub generated_at: DateTime<Utc>,
    pub stats: DashboardStats,
    pub categories: Vec<String>,
    pub last_load: LoadEvent,
    pub strategy_running: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub load: LoadEvent,
    /// False when the upload is live but could not be saved for the next start.
    pub persisted: bool,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResponse {
    pub text: String,
    pub fallback: bool,
    pub generated_at: DateTime<Utc>,
    pub items_analyzed: Vec<SummaryItem>,
}

impl From<&StrategyReport> for StrategyResponse {
    fn from(report: &StrategyReport) -> Self {
        Self {
            text: report.text.clone(),
            fallback: report.fallback,
            generated_at: report.generated_at,
            items_analyzed: report.items_analyzed.clone(),
        }
    }
}
