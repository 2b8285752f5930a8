use async_trait::async_trait;

/// Opaque key-value store scoped to one dashboard session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn save(&self, key: &str, value: String) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
