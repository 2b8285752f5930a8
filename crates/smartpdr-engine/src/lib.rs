pub mod metrics;
pub mod query;

pub use metrics::{aging_days, classify, classify_record, monthly_demand, parse_purchase_date};
pub use query::{
    DashboardStats, InventoryFilter, SortDirection, SortKey, SortOrder, categories, select,
};
