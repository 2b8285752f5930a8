use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use smartpdr_advisor::{StrategyAdvisor, Summarizer, SummaryError};
use smartpdr_core::{PdrPolicy, SessionStore};
use smartpdr_dashboard::{AppState, build_router};
use smartpdr_session::{CUSTOM_INVENTORY_KEY, InMemorySessionStore, persist_records};
use tokio::sync::Notify;
use tower::ServiceExt;

struct CannedSummarizer;

#[async_trait]
impl Summarizer for CannedSummarizer {
    async fn summarize(&self, _prompt: &str) -> Result<String, SummaryError> {
        Ok("Replenish the sensors first.".to_string())
    }
}

#[derive(Default)]
struct GatedSummarizer {
    release: Notify,
}

#[async_trait]
impl Summarizer for GatedSummarizer {
    async fn summarize(&self, _prompt: &str) -> Result<String, SummaryError> {
        self.release.notified().await;
        Ok("done".to_string())
    }
}

struct ReadOnlyStore;

#[async_trait]
impl SessionStore for ReadOnlyStore {
    async fn load(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _value: String) -> anyhow::Result<()> {
        anyhow::bail!("read-only volume")
    }

    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

async fn app_with(store: Arc<dyn SessionStore>, summarizer: Arc<dyn Summarizer>) -> AppState {
    let policy = PdrPolicy::default();
    let advisor = Arc::new(StrategyAdvisor::new(summarizer, policy.summary_top_n));
    AppState::restore(store, advisor, policy).await
}

async fn app() -> (AppState, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::default());
    let state = app_with(store.clone(), Arc::new(CannedSummarizer)).await;
    (state, store)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn upload(content_type: &str, body: &str) -> Request<Body> {
    Request::post("/inventory/upload")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

const UPLOAD_CSV: &str = "\
SKU,Product,Category,On Hand,Last Purchase,Criticality,V1,V2,V3,V4,V5,V6
U-1,Valve,Plumbing,5,2024-01-10,3,100,100,100,100,100,100
U-2,Gasket,Plumbing,900,2024-01-10,1,10,10,10,10,10,10
";

#[tokio::test]
async fn healthz_answers_ok() {
    let (state, _) = app().await;
    let (status, body) = send(&build_router(state), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn starts_on_sample_data() {
    let (state, _) = app().await;
    let (status, body) = send(&build_router(state), get("/dashboard")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total"], 6);
    assert_eq!(body["last_load"]["source"], "SAMPLE");
    assert_eq!(body["strategy_running"], false);
    let categories: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        ["Chemicals", "Electronics", "Hardware", "Spare Parts"]
    );
}

#[tokio::test]
async fn restores_a_saved_upload_on_start() {
    let store = Arc::new(InMemorySessionStore::default());
    let mut records = smartpdr_core::sample_records();
    records.truncate(2);
    persist_records(store.as_ref(), &records).await.unwrap();

    let state = app_with(store, Arc::new(CannedSummarizer)).await;
    let (_, body) = send(&build_router(state), get("/dashboard")).await;
    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["last_load"]["source"], "SESSION");
}

#[tokio::test]
async fn inventory_is_filtered_and_sorted() {
    let (state, _) = app().await;
    let router = build_router(state);

    let (status, body) = send(
        &router,
        get("/inventory?category=Electronics&sort=id&direction=asc"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 6);
    assert_eq!(body["matched"], 2);
    assert_eq!(body["items"][0]["sku"], "SKU-001");
    assert_eq!(body["items"][1]["sku"], "SKU-003");
    assert!(body["items"][0]["priority_label"].is_string());

    let (_, body) = send(&router, get("/inventory?category=All")).await;
    assert_eq!(body["matched"], 6);
}

#[tokio::test]
async fn unranked_listing_keeps_score_order() {
    let (state, _) = app().await;
    let (_, body) = send(&build_router(state), get("/inventory")).await;
    let scores: Vec<u64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["priority_score"].as_u64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn unknown_priority_filter_is_rejected() {
    let (state, _) = app().await;
    let (status, _) = send(&build_router(state), get("/inventory?priority=urgent")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_item_lookup() {
    let (state, _) = app().await;
    let router = build_router(state);

    let (status, body) = send(&router, get("/inventory/SKU-003")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "SKU-003");
    assert!(body["reorderPoint"].is_number());

    let (status, _) = send(&router, get("/inventory/SKU-999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn csv_upload_replaces_and_persists() {
    let (state, store) = app().await;
    let router = build_router(state);

    let (status, body) = send(&router, upload("text/csv", UPLOAD_CSV)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persisted"], true);
    assert_eq!(body["load"]["source"], "UPLOAD");
    assert_eq!(body["load"]["record_count"], 2);
    assert_eq!(body["stats"]["critical"], 1);
    assert_eq!(body["stats"]["healthy"], 1);

    let (_, body) = send(&router, get("/inventory/U-1")).await;
    assert_eq!(body["priority"], "CRITICAL");
    assert!(store.load(CUSTOM_INVENTORY_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn json_upload_is_detected_by_content_type() {
    let (state, _) = app().await;
    let router = build_router(state);

    let rows = r#"[{"SKU": "J-1", "Stock": "37.5"}]"#;
    let (status, body) = send(&router, upload("application/json", rows)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["load"]["record_count"], 1);

    let (_, body) = send(&router, get("/inventory/J-1")).await;
    assert_eq!(body["currentStock"], 37.5);
    assert_eq!(body["criticality"], 2);
}

#[tokio::test]
async fn rejected_upload_leaves_state_unchanged() {
    let (state, store) = app().await;
    let router = build_router(state);

    let (status, _) = send(&router, upload("text/csv", "SKU,Stock\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&router, upload("application/json", r#"{"SKU": "x"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&router, get("/dashboard")).await;
    assert_eq!(body["stats"]["total"], 6);
    assert_eq!(body["last_load"]["source"], "SAMPLE");
    assert!(store.load(CUSTOM_INVENTORY_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_save_still_applies_upload() {
    let state = app_with(Arc::new(ReadOnlyStore), Arc::new(CannedSummarizer)).await;
    let router = build_router(state);

    let (status, body) = send(&router, upload("text/csv", UPLOAD_CSV)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persisted"], false);

    let (_, body) = send(&router, get("/dashboard")).await;
    assert_eq!(body["stats"]["total"], 2);
}

#[tokio::test]
async fn clearing_the_session_reloads_sample_data() {
    let (state, store) = app().await;
    let router = build_router(state);
    send(&router, upload("text/csv", UPLOAD_CSV)).await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/inventory/session")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "SAMPLE");
    assert_eq!(body["record_count"], 6);
    assert!(store.load(CUSTOM_INVENTORY_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn strategy_report_is_generated_and_kept() {
    let (state, _) = app().await;
    let router = build_router(state);

    let (status, _) = send(&router, get("/strategy")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::post("/strategy").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Replenish the sensors first.");
    assert_eq!(body["fallback"], false);
    assert_eq!(body["items_analyzed"].as_array().unwrap().len(), 6);

    let (status, body) = send(&router, get("/strategy")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Replenish the sensors first.");
}

#[tokio::test]
async fn overlapping_strategy_request_conflicts() {
    let summarizer = Arc::new(GatedSummarizer::default());
    let state = app_with(
        Arc::new(InMemorySessionStore::default()),
        summarizer.clone(),
    )
    .await;
    let advisor = state.advisor.clone();
    let router = build_router(state);

    let first = tokio::spawn({
        let router = router.clone();
        async move {
            let request = Request::post("/strategy").body(Body::empty()).unwrap();
            router.oneshot(request).await.unwrap().status()
        }
    });
    while !advisor.is_running() {
        tokio::task::yield_now().await;
    }

    let (_, body) = send(&router, get("/dashboard")).await;
    assert_eq!(body["strategy_running"], true);

    let request = Request::post("/strategy").body(Body::empty()).unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::CONFLICT);

    summarizer.release.notify_one();
    assert_eq!(first.await.unwrap(), StatusCode::OK);
}

#[tokio::test]
async fn report_of_a_replaced_inventory_is_not_kept() {
    let summarizer = Arc::new(GatedSummarizer::default());
    let state = app_with(
        Arc::new(InMemorySessionStore::default()),
        summarizer.clone(),
    )
    .await;
    let advisor = state.advisor.clone();
    let router = build_router(state);

    let analysis = tokio::spawn({
        let router = router.clone();
        async move {
            let request = Request::post("/strategy").body(Body::empty()).unwrap();
            router.oneshot(request).await.unwrap().status()
        }
    });
    while !advisor.is_running() {
        tokio::task::yield_now().await;
    }

    let (status, _) = send(&router, upload("text/csv", UPLOAD_CSV)).await;
    assert_eq!(status, StatusCode::OK);

    summarizer.release.notify_one();
    assert_eq!(analysis.await.unwrap(), StatusCode::OK);

    let (status, _) = send(&router, get("/strategy")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_upload_and_clear_leave_store_and_state_in_step() {
    for _ in 0..20 {
        let (state, store) = app().await;
        let router = build_router(state);

        let clear = Request::builder()
            .method(Method::DELETE)
            .uri("/inventory/session")
            .body(Body::empty())
            .unwrap();
        let (uploaded, cleared) = tokio::join!(
            send(&router, upload("text/csv", UPLOAD_CSV)),
            send(&router, clear),
        );
        assert_eq!(uploaded.0, StatusCode::OK);
        assert_eq!(cleared.0, StatusCode::OK);

        let (_, body) = send(&router, get("/dashboard")).await;
        let saved = store.load(CUSTOM_INVENTORY_KEY).await.unwrap();
        match body["last_load"]["source"].as_str() {
            Some("UPLOAD") => assert!(saved.is_some()),
            Some("SAMPLE") => assert!(saved.is_none()),
            other => panic!("unexpected load source {other:?}"),
        }
    }
}

#[tokio::test]
async fn workbook_upload_is_detected_by_signature() {
    let (state, _) = app().await;
    let router = build_router(state);

    let workbook: &[u8] = include_bytes!("../../smartpdr-ingest/tests/fixtures/inventory.xlsx");
    let request = Request::post("/inventory/upload")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(workbook))
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["load"]["record_count"], 2);

    let (_, body) = send(&router, get("/inventory/SKU-100")).await;
    assert_eq!(body["category"], "Fontanería");
    assert_eq!(body["priority"], "CRITICAL");
}
