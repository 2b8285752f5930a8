use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to serialize inventory records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("session store rejected '{key}': {reason}")]
    Store { key: String, reason: String },
}

impl SessionError {
    pub(crate) fn store(key: &str, err: anyhow::Error) -> Self {
        Self::Store {
            key: key.to_string(),
            reason: format!("{err:#}"),
        }
    }
}
