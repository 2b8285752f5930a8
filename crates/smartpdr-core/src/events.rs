use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadSource {
    Sample,
    Session,
    Upload,
}

/// One replacement of the working record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadEvent {
    pub id: Uuid,
    pub source: LoadSource,
    pub record_count: usize,
    pub occurred_at: DateTime<Utc>,
}

impl LoadEvent {
    pub fn new(source: LoadSource, record_count: usize, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            record_count,
            occurred_at,
        }
    }
}
