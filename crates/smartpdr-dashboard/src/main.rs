use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result as AnyResult;
use smartpdr_advisor::{GenerativeTextClient, StrategyAdvisor};
use smartpdr_core::SessionStore;
use smartpdr_dashboard::{AppState, build_router};
use smartpdr_platform::ServiceConfig;
use smartpdr_session::{FileSessionStore, InMemorySessionStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "smartpdr_dashboard=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8090")?;

    let store: Arc<dyn SessionStore> = match &config.session_dir {
        Some(dir) => {
            let store = FileSessionStore::open(dir).await?;
            info!("session store at {}", store.root().display());
            Arc::new(store)
        }
        None => {
            info!("SESSION_DIR not set, uploads are kept in memory only");
            Arc::new(InMemorySessionStore::default())
        }
    };

    let client = GenerativeTextClient::new(config.summarizer.clone())?;
    if !client.has_credential() {
        warn!("no summarization API key configured, strategy analysis will use fallback text");
    }
    let advisor = Arc::new(StrategyAdvisor::new(
        Arc::new(client),
        config.policy.summary_top_n,
    ));

    let state = AppState::restore(store, advisor, config.policy.clone()).await;
    let router = build_router(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("dashboard service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
