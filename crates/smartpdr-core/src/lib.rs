pub mod events;
pub mod models;
pub mod policy;
pub mod sample;
pub mod storage;

pub use events::{LoadEvent, LoadSource};
pub use models::{ClassifiedInventoryRecord, Criticality, Priority, RawInventoryRecord};
pub use policy::{PdrPolicy, PolicyError, ReserveFactors, ScoreBands};
pub use sample::sample_records;
pub use storage::SessionStore;
