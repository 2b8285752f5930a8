pub mod config;
pub mod contracts;

pub use config::{ServiceConfig, load_policy};
pub use contracts::{
    DashboardResponse, InventoryListResponse, InventoryQuery, InventoryRow, StrategyResponse,
    UploadResponse, priority_label,
};
