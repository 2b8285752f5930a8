//! Map loosely named spreadsheet columns onto `RawInventoryRecord`.
//!
//! Column names are matched after `normalize_header`, so aliases below are
//! written in normalized form. The first non-blank alias wins.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use smartpdr_core::{Criticality, RawInventoryRecord};
use tracing::debug;

use crate::sheet::SheetRow;

const ID_ALIASES: [&str; 6] = ["id", "sku", "referencia", "reference", "code", "codigo"];
const NAME_ALIASES: [&str; 6] = [
    "nombre",
    "producto",
    "descripcion",
    "name",
    "product",
    "description",
];
const CATEGORY_ALIASES: [&str; 5] = ["categoria", "familia", "clasificacion", "category", "family"];
const STOCK_ALIASES: [&str; 7] = [
    "stock",
    "existencia",
    "existencias",
    "cantidad",
    "onhand",
    "quantity",
    "currentstock",
];
const DATE_ALIASES: [&str; 5] = [
    "fecha",
    "ultimacompra",
    "lastpurchase",
    "lastpurchasedate",
    "date",
];
const LOT_ALIASES: [&str; 5] = [
    "lote",
    "cantidadcompra",
    "ultimoingreso",
    "lastpurchaseqty",
    "lot",
];
const CRITICALITY_ALIASES: [&str; 2] = ["criticidad", "criticality"];

/// Six trailing months of sales: positional, Spanish and English headers.
const SALES_ALIASES: [[&str; 4]; 6] = [
    ["v1", "m1", "enero", "january"],
    ["v2", "m2", "febrero", "february"],
    ["v3", "m3", "marzo", "march"],
    ["v4", "m4", "abril", "april"],
    ["v5", "m5", "mayo", "may"],
    ["v6", "m6", "junio", "june"],
];

pub const DEFAULT_NAME: &str = "Unnamed item";
pub const DEFAULT_CATEGORY: &str = "General";

/// Spreadsheet day zero; serial 1 is 1899-12-31.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// Serial of 9999-12-31.
const MAX_DATE_SERIAL: u64 = 2_958_465;

/// `today` fills in a missing purchase date.
pub fn map_rows(rows: &[SheetRow], today: NaiveDate) -> Vec<RawInventoryRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| map_row(row, index, today))
        .collect()
}

pub fn map_row(row: &SheetRow, index: usize, today: NaiveDate) -> RawInventoryRecord {
    let id = row
        .first(&ID_ALIASES)
        .map(str::to_string)
        .unwrap_or_else(|| format!("SKU-{index}"));
    let name = row.first(&NAME_ALIASES).unwrap_or(DEFAULT_NAME).to_string();
    let category = row
        .first(&CATEGORY_ALIASES)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();
    let current_stock = quantity_cell(row, &STOCK_ALIASES, index);
    let last_purchase_qty = quantity_cell(row, &LOT_ALIASES, index);
    let last_purchase_date = row
        .first(&DATE_ALIASES)
        .map(normalize_date_cell)
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    let criticality = row
        .first(&CRITICALITY_ALIASES)
        .and_then(parse_criticality)
        .unwrap_or_default();
    let monthly_sales = SALES_ALIASES
        .iter()
        .map(|aliases| quantity_cell(row, aliases, index))
        .collect();

    RawInventoryRecord {
        id,
        name,
        category,
        monthly_sales,
        current_stock,
        last_purchase_date,
        last_purchase_qty,
        criticality,
    }
}

fn quantity_cell(row: &SheetRow, aliases: &[&str], index: usize) -> Decimal {
    let Some(raw) = row.first(aliases) else {
        return Decimal::ZERO;
    };
    parse_quantity(raw).unwrap_or_else(|| {
        debug!(
            row = index + 1,
            column = aliases[0],
            value = raw,
            "unparseable quantity, using 0"
        );
        Decimal::ZERO
    })
}

/// Decimal text, with a lone decimal comma ("37,5") or scientific notation
/// also accepted.
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = Decimal::from_str(raw) {
        return Some(value);
    }
    if raw.matches(',').count() == 1 && !raw.contains('.') {
        if let Ok(value) = Decimal::from_str(&raw.replace(',', ".")) {
            return Some(value);
        }
    }
    Decimal::from_scientific(raw).ok()
}

/// Integral tiers 1–3; fractional input is truncated, anything else falls
/// back to the caller's default.
pub fn parse_criticality(raw: &str) -> Option<Criticality> {
    let level = parse_quantity(raw)?.trunc().to_u8()?;
    Criticality::from_level(level)
}

/// Spreadsheet tools export dates as day serials; turn those into ISO dates
/// and pass anything else through untouched.
pub fn normalize_date_cell(raw: &str) -> String {
    let serial = raw
        .parse::<u64>()
        .ok()
        .filter(|serial| (1..=MAX_DATE_SERIAL).contains(serial));
    let (year, month, day) = SERIAL_EPOCH;
    serial
        .and_then(|serial| {
            NaiveDate::from_ymd_opt(year, month, day)?.checked_add_days(Days::new(serial))
        })
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}
