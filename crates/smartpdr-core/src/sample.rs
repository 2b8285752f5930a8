use rust_decimal::Decimal;

use crate::models::{Criticality, RawInventoryRecord};

/// Built-in dataset shown before anything has been uploaded.
pub fn sample_records() -> Vec<RawInventoryRecord> {
    vec![
        record(
            "SKU-001",
            "Industrial Sensor Pro-X",
            "Electronics",
            [120, 140, 110, 130, 150, 145],
            45,
            "2023-11-15",
            100,
            Criticality::High,
        ),
        record(
            "SKU-002",
            "Reinforced Cable 5m 240V",
            "Hardware",
            [50, 45, 60, 55, 40, 50],
            120,
            "2024-02-10",
            50,
            Criticality::Low,
        ),
        record(
            "SKU-003",
            "WiFi Control Module v2",
            "Electronics",
            [10, 15, 8, 12, 20, 18],
            5,
            "2023-10-01",
            40,
            Criticality::High,
        ),
        record(
            "SKU-004",
            "Synthetic Grease HT-1",
            "Chemicals",
            [30, 35, 28, 32, 40, 35],
            15,
            "2024-03-01",
            50,
            Criticality::Medium,
        ),
        record(
            "SKU-005",
            "Stainless Bolt M8 (box)",
            "Hardware",
            [200, 180, 210, 190, 220, 200],
            900,
            "2024-05-20",
            600,
            Criticality::Low,
        ),
        record(
            "SKU-006",
            "Hydraulic Seal Kit",
            "Spare Parts",
            [4, 6, 5, 3, 7, 5],
            20,
            "2023-06-12",
            30,
            Criticality::Medium,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    name: &str,
    category: &str,
    sales: [i64; 6],
    stock: i64,
    last_purchase_date: &str,
    last_purchase_qty: i64,
    criticality: Criticality,
) -> RawInventoryRecord {
    RawInventoryRecord {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        monthly_sales: sales.into_iter().map(Decimal::from).collect(),
        current_stock: Decimal::from(stock),
        last_purchase_date: last_purchase_date.to_string(),
        last_purchase_qty: Decimal::from(last_purchase_qty),
        criticality,
    }
}
