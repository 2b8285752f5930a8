pub mod error;
pub mod records;
pub mod stores;

pub use error::SessionError;
pub use records::{
    CUSTOM_INVENTORY_KEY, RestoredSession, clear_records, persist_records, restore_records,
};
pub use stores::{FileSessionStore, InMemorySessionStore};
