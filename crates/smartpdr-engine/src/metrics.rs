//! PDR metrics: turns raw stock/sales records into ranked classifications.
//!
//! For each record:
//! - D (monthly demand) = mean of `monthly_sales`, 0 when there are none
//! - R (safety reserve) = ceil(D x reserve factor of the criticality tier)
//! - P (reorder point)  = ceil(D + R)
//! - target stock       = ceil(D x target multiplier)
//!
//! Stock at or below P is CRITICAL, at or below target is WARNING, anything
//! above is HEALTHY. Stale purchases add a bonus to the ranking score only.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use smartpdr_core::{ClassifiedInventoryRecord, PdrPolicy, Priority, RawInventoryRecord};

const SECONDS_PER_DAY: i64 = 86_400;

/// Date-only layouts accepted for `last_purchase_date`, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Classify every record and rank them by descending `priority_score`.
///
/// `now` is shared by all records of the call. Ties keep input order.
pub fn classify(
    records: &[RawInventoryRecord],
    policy: &PdrPolicy,
    now: DateTime<Utc>,
) -> Vec<ClassifiedInventoryRecord> {
    let mut classified: Vec<_> = records
        .iter()
        .map(|record| classify_record(record, policy, now))
        .collect();
    classified.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    classified
}

pub fn classify_record(
    record: &RawInventoryRecord,
    policy: &PdrPolicy,
    now: DateTime<Utc>,
) -> ClassifiedInventoryRecord {
    let monthly_demand = monthly_demand(&record.monthly_sales);
    let safety_reserve = monthly_demand
        .saturating_mul(policy.reserve_factor(record.criticality))
        .ceil();
    let reorder_point = monthly_demand.saturating_add(safety_reserve).ceil();
    let target_stock = monthly_demand
        .saturating_mul(policy.target_multiplier)
        .ceil();
    let stock_gap = target_stock.saturating_sub(record.current_stock);
    let aging_days = aging_days(&record.last_purchase_date, now);

    let (priority, base_score) = prioritize(
        record.current_stock,
        reorder_point,
        target_stock,
        policy,
    );
    let priority_score = if aging_days > policy.aging_threshold_days {
        base_score.saturating_add(policy.aging_bonus)
    } else {
        base_score
    };

    ClassifiedInventoryRecord {
        record: record.clone(),
        monthly_demand,
        safety_reserve,
        reorder_point,
        target_stock,
        stock_gap,
        aging_days,
        priority,
        priority_score,
    }
}

/// Mean of the sales history; an empty history has zero demand.
pub fn monthly_demand(sales: &[Decimal]) -> Decimal {
    let total = sales
        .iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(*value));
    let months = Decimal::from(sales.len().max(1));
    total / months
}

/// First matching band wins: reorder point, then target stock.
pub fn prioritize(
    current_stock: Decimal,
    reorder_point: Decimal,
    target_stock: Decimal,
    policy: &PdrPolicy,
) -> (Priority, u32) {
    if current_stock <= reorder_point {
        (Priority::Critical, policy.scores.critical)
    } else if current_stock <= target_stock {
        (Priority::Warning, policy.scores.warning)
    } else {
        (Priority::Healthy, policy.scores.healthy)
    }
}

/// Whole days elapsed since `last_purchase_date`, floored. Unparseable dates
/// count as zero days.
pub fn aging_days(last_purchase_date: &str, now: DateTime<Utc>) -> i64 {
    match parse_purchase_date(last_purchase_date) {
        Some(purchased_at) => now
            .signed_duration_since(purchased_at)
            .num_seconds()
            .div_euclid(SECONDS_PER_DAY),
        None => 0,
    }
}

/// Date-only values are taken as midnight UTC.
pub fn parse_purchase_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.and_utc());
        }
    }
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    })
}
