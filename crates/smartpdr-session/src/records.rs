//! Saving and restoring the uploaded record set.
//!
//! Whatever is in the store is untrusted: anything that fails to decode is
//! discarded and the sample dataset takes its place.

use smartpdr_core::{LoadSource, RawInventoryRecord, SessionStore, sample_records};
use tracing::{info, warn};

use crate::error::SessionError;

/// Key the last successful upload is saved under.
pub const CUSTOM_INVENTORY_KEY: &str = "customInventory";

#[derive(Debug, Clone, PartialEq)]
pub struct RestoredSession {
    pub records: Vec<RawInventoryRecord>,
    pub source: LoadSource,
}

impl RestoredSession {
    fn sample() -> Self {
        Self {
            records: sample_records(),
            source: LoadSource::Sample,
        }
    }
}

/// Never fails; absence, store errors and corrupt payloads all yield the
/// sample dataset.
pub async fn restore_records(store: &dyn SessionStore) -> RestoredSession {
    let payload = match store.load(CUSTOM_INVENTORY_KEY).await {
        Ok(Some(payload)) => payload,
        Ok(None) => return RestoredSession::sample(),
        Err(err) => {
            warn!("failed to read saved inventory, using sample data: {err:#}");
            return RestoredSession::sample();
        }
    };

    match serde_json::from_str::<Vec<RawInventoryRecord>>(&payload) {
        Ok(records) if records.is_empty() => RestoredSession::sample(),
        Ok(records) => {
            info!(records = records.len(), "restored saved inventory");
            RestoredSession {
                records,
                source: LoadSource::Session,
            }
        }
        Err(err) => {
            warn!("discarding corrupt saved inventory: {err}");
            if let Err(err) = store.remove(CUSTOM_INVENTORY_KEY).await {
                warn!("failed to discard corrupt saved inventory: {err:#}");
            }
            RestoredSession::sample()
        }
    }
}

pub async fn persist_records(
    store: &dyn SessionStore,
    records: &[RawInventoryRecord],
) -> Result<(), SessionError> {
    let payload = serde_json::to_string(records)?;
    store
        .save(CUSTOM_INVENTORY_KEY, payload)
        .await
        .map_err(|err| SessionError::store(CUSTOM_INVENTORY_KEY, err))
}

pub async fn clear_records(store: &dyn SessionStore) -> Result<(), SessionError> {
    store
        .remove(CUSTOM_INVENTORY_KEY)
        .await
        .map_err(|err| SessionError::store(CUSTOM_INVENTORY_KEY, err))
}
