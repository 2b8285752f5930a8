pub mod state;

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{delete, get, post},
};
use chrono::Utc;
use smartpdr_advisor::{AdvisorError, StrategyAdvisor};
use smartpdr_core::{
    ClassifiedInventoryRecord, LoadEvent, LoadSource, PdrPolicy, RawInventoryRecord, SessionStore,
    sample_records,
};
use smartpdr_engine::{DashboardStats, categories, select};
use smartpdr_ingest::{UploadFormat, parse_upload};
use smartpdr_platform::{
    DashboardResponse, InventoryListResponse, InventoryQuery, InventoryRow, StrategyResponse,
    UploadResponse,
};
use smartpdr_session::{clear_records, persist_records, restore_records};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

pub use state::DashboardState;

type HandlerResult<T> = std::result::Result<Json<T>, (StatusCode, String)>;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<RwLock<DashboardState>>,
    pub store: Arc<dyn SessionStore>,
    pub advisor: Arc<StrategyAdvisor>,
    pub policy: Arc<PdrPolicy>,
    /// Serializes writers so the saved session and the served set agree.
    load_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Start from whatever the store holds, or the sample dataset.
    pub async fn restore(
        store: Arc<dyn SessionStore>,
        advisor: Arc<StrategyAdvisor>,
        policy: PdrPolicy,
    ) -> Self {
        let restored = restore_records(store.as_ref()).await;
        let dashboard =
            DashboardState::load(restored.records, restored.source, &policy, Utc::now());
        info!(
            records = dashboard.classified().len(),
            source = ?restored.source,
            "inventory loaded"
        );

        Self {
            dashboard: Arc::new(RwLock::new(dashboard)),
            store,
            advisor,
            policy: Arc::new(policy),
            load_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Classify off-lock, then swap the new set in.
    async fn replace(&self, records: Vec<RawInventoryRecord>, source: LoadSource) -> LoadEvent {
        let next = DashboardState::load(records, source, &self.policy, Utc::now());
        let event = next.last_load().clone();
        *self.dashboard.write().await = next;
        event
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/dashboard", get(dashboard))
        .route("/inventory", get(list_inventory))
        .route("/inventory/upload", post(upload_inventory))
        .route("/inventory/session", delete(clear_session))
        .route("/inventory/{sku}", get(inventory_item))
        .route("/strategy", get(last_strategy).post(run_strategy))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let dashboard = state.dashboard.read().await;
    Json(DashboardResponse {
        generated_at: Utc::now(),
        stats: DashboardStats::collect(dashboard.classified(), &state.policy),
        categories: categories(dashboard.classified()),
        last_load: dashboard.last_load().clone(),
        strategy_running: state.advisor.is_running(),
    })
}

async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> HandlerResult<InventoryListResponse> {
    let filter = query.filter().map_err(invalid_request)?;
    let dashboard = state.dashboard.read().await;
    let items: Vec<InventoryRow> = select(dashboard.classified(), &filter, query.order())
        .into_iter()
        .map(InventoryRow::from)
        .collect();

    Ok(Json(InventoryListResponse {
        total: dashboard.classified().len(),
        matched: items.len(),
        items,
    }))
}

async fn inventory_item(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> HandlerResult<ClassifiedInventoryRecord> {
    let dashboard = state.dashboard.read().await;
    dashboard
        .find(&sku)
        .cloned()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown sku {sku}")))
}

async fn upload_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult<UploadResponse> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let format = UploadFormat::detect(content_type, &body);
    let records =
        parse_upload(&body, format, Utc::now().date_naive()).map_err(invalid_request)?;

    let _load = state.load_lock.lock().await;
    let persisted = match persist_records(state.store.as_ref(), &records).await {
        Ok(()) => true,
        Err(err) => {
            warn!("upload applied but not saved: {err}");
            false
        }
    };

    let load = state.replace(records, LoadSource::Upload).await;
    info!(records = load.record_count, persisted, ?format, "inventory upload applied");

    let dashboard = state.dashboard.read().await;
    Ok(Json(UploadResponse {
        load,
        persisted,
        stats: DashboardStats::collect(dashboard.classified(), &state.policy),
    }))
}

async fn clear_session(State(state): State<AppState>) -> HandlerResult<LoadEvent> {
    let _load = state.load_lock.lock().await;
    clear_records(state.store.as_ref())
        .await
        .map_err(internal_error)?;
    let load = state.replace(sample_records(), LoadSource::Sample).await;
    info!("saved upload cleared, sample data restored");
    Ok(Json(load))
}

async fn run_strategy(State(state): State<AppState>) -> HandlerResult<StrategyResponse> {
    let (load_id, records) = {
        let dashboard = state.dashboard.read().await;
        (dashboard.last_load().id, dashboard.classified().to_vec())
    };

    let report = state
        .advisor
        .analyze(&records)
        .await
        .map_err(|err| match err {
            AdvisorError::Busy => (StatusCode::CONFLICT, err.to_string()),
        })?;

    let response = StrategyResponse::from(&report);
    let mut dashboard = state.dashboard.write().await;
    if dashboard.last_load().id == load_id {
        dashboard.record_strategy(report);
    } else {
        info!("inventory reloaded during analysis, report not kept");
    }
    Ok(Json(response))
}

async fn last_strategy(State(state): State<AppState>) -> HandlerResult<StrategyResponse> {
    let dashboard = state.dashboard.read().await;
    dashboard
        .last_strategy()
        .map(|report| Json(StrategyResponse::from(report)))
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                "no strategy analysis has been run yet".to_string(),
            )
        })
}

fn invalid_request<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn internal_error<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
