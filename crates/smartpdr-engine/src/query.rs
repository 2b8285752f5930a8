//! Read-side queries over an already classified record set: search, filter,
//! sort and the headline counts shown on the dashboard.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smartpdr_core::{ClassifiedInventoryRecord, PdrPolicy, Priority};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Case-insensitive substring of the name or SKU.
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
}

impl InventoryFilter {
    pub fn matches(&self, record: &ClassifiedInventoryRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.name().to_lowercase().contains(&term)
                    || record.id().to_lowercase().contains(&term)
            }
        };
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| record.category() == category);
        let matches_priority = self
            .priority
            .is_none_or(|priority| record.priority == priority);

        matches_search && matches_category && matches_priority
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Name,
    Category,
    CurrentStock,
    MonthlyDemand,
    ReorderPoint,
    TargetStock,
    StockGap,
    AgingDays,
    PriorityScore,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    fn compare(&self, a: &ClassifiedInventoryRecord, b: &ClassifiedInventoryRecord) -> Ordering {
        let ordering = match self.key {
            SortKey::Id => a.id().cmp(b.id()),
            SortKey::Name => a.name().cmp(b.name()),
            SortKey::Category => a.category().cmp(b.category()),
            SortKey::CurrentStock => a.current_stock().cmp(&b.current_stock()),
            SortKey::MonthlyDemand => a.monthly_demand.cmp(&b.monthly_demand),
            SortKey::ReorderPoint => a.reorder_point.cmp(&b.reorder_point),
            SortKey::TargetStock => a.target_stock.cmp(&b.target_stock),
            SortKey::StockGap => a.stock_gap.cmp(&b.stock_gap),
            SortKey::AgingDays => a.aging_days.cmp(&b.aging_days),
            SortKey::PriorityScore => a.priority_score.cmp(&b.priority_score),
            SortKey::Status => a.priority.rank().cmp(&b.priority.rank()),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Filter then optionally re-sort. Without an order the engine ranking is kept;
/// with one, equal keys keep their relative ranking.
pub fn select<'a>(
    records: &'a [ClassifiedInventoryRecord],
    filter: &InventoryFilter,
    order: Option<SortOrder>,
) -> Vec<&'a ClassifiedInventoryRecord> {
    let mut selected: Vec<_> = records.iter().filter(|r| filter.matches(r)).collect();
    if let Some(order) = order {
        selected.sort_by(|a, b| order.compare(a, b));
    }
    selected
}

/// Distinct categories, alphabetically.
pub fn categories(records: &[ClassifiedInventoryRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.category().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub healthy: usize,
    /// Items whose aging exceeds the policy threshold.
    pub dead_stock: usize,
    /// Units needed to bring every under-target item up to its target.
    pub replenishment_units: Decimal,
}

impl DashboardStats {
    pub fn collect(records: &[ClassifiedInventoryRecord], policy: &PdrPolicy) -> Self {
        records.iter().fold(Self::default(), |mut stats, record| {
            stats.total += 1;
            match record.priority {
                Priority::Critical => stats.critical += 1,
                Priority::Warning => stats.warning += 1,
                Priority::Healthy => stats.healthy += 1,
            }
            if record.aging_days > policy.aging_threshold_days {
                stats.dead_stock += 1;
            }
            if record.stock_gap > Decimal::ZERO {
                stats.replenishment_units =
                    stats.replenishment_units.saturating_add(record.stock_gap);
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use smartpdr_core::sample_records;

    use super::*;
    use crate::classify;

    fn classified() -> Vec<ClassifiedInventoryRecord> {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        classify(&sample_records(), &PdrPolicy::default(), now)
    }

    #[test]
    fn search_matches_name_or_sku_case_insensitively() {
        let records = classified();
        let filter = InventoryFilter {
            search: Some("wifi".to_string()),
            ..Default::default()
        };
        let hits = select(&records, &filter, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), "SKU-003");

        let filter = InventoryFilter {
            search: Some("sku-00".to_string()),
            ..Default::default()
        };
        assert_eq!(select(&records, &filter, None).len(), records.len());
    }

    #[test]
    fn blank_search_matches_everything() {
        let records = classified();
        let filter = InventoryFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(select(&records, &filter, None).len(), records.len());
    }

    #[test]
    fn category_and_priority_filters_combine() {
        let records = classified();
        let filter = InventoryFilter {
            category: Some("Electronics".to_string()),
            priority: Some(Priority::Critical),
            ..Default::default()
        };
        let hits = select(&records, &filter, None);
        assert!(!hits.is_empty());
        assert!(hits
            .iter()
            .all(|r| r.category() == "Electronics" && r.priority == Priority::Critical));
    }

    #[test]
    fn status_sort_puts_critical_first_when_descending() {
        let records = classified();
        let order = SortOrder {
            key: SortKey::Status,
            direction: SortDirection::Desc,
        };
        let sorted = select(&records, &InventoryFilter::default(), Some(order));
        let ranks: Vec<_> = sorted.iter().map(|r| r.priority.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn ascending_stock_sort() {
        let records = classified();
        let order = SortOrder {
            key: SortKey::CurrentStock,
            direction: SortDirection::Asc,
        };
        let sorted = select(&records, &InventoryFilter::default(), Some(order));
        assert_eq!(sorted.first().map(|r| r.id()), Some("SKU-003"));
        assert_eq!(sorted.last().map(|r| r.id()), Some("SKU-005"));
    }

    #[test]
    fn categories_are_unique_and_sorted() {
        assert_eq!(
            categories(&classified()),
            ["Chemicals", "Electronics", "Hardware", "Spare Parts"]
        );
    }

    #[test]
    fn stats_partition_the_record_set() {
        let records = classified();
        let stats = DashboardStats::collect(&records, &PdrPolicy::default());
        assert_eq!(stats.total, records.len());
        assert_eq!(stats.critical + stats.warning + stats.healthy, stats.total);
        assert!(stats.dead_stock > 0);
        assert!(stats.replenishment_units > Decimal::ZERO);
    }
}
