use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business importance tier of a SKU. Serialized as the integer 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
}

impl Criticality {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl TryFrom<u8> for Criticality {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_level(value).ok_or_else(|| format!("criticality must be 1, 2 or 3, got {value}"))
    }
}

impl From<Criticality> for u8 {
    fn from(value: Criticality) -> Self {
        value.level()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    Warning,
    Healthy,
}

impl Priority {
    /// Ordinal used when sorting by status: Critical ranks highest.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::Warning => 2,
            Self::Healthy => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInventoryRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    /// One entry per trailing month, oldest first.
    pub monthly_sales: Vec<Decimal>,
    pub current_stock: Decimal,
    pub last_purchase_date: String,
    pub last_purchase_qty: Decimal,
    pub criticality: Criticality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedInventoryRecord {
    #[serde(flatten)]
    pub record: RawInventoryRecord,
    pub monthly_demand: Decimal,
    pub safety_reserve: Decimal,
    pub reorder_point: Decimal,
    pub target_stock: Decimal,
    pub stock_gap: Decimal,
    pub aging_days: i64,
    pub priority: Priority,
    pub priority_score: u32,
}

impl ClassifiedInventoryRecord {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn category(&self) -> &str {
        &self.record.category
    }

    pub fn current_stock(&self) -> Decimal {
        self.record.current_stock
    }
}
