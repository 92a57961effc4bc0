//! Ordered key-value storage.
//!
//! The circuit breaker never talks to a database directly. Every read and write
//! goes through [`KvStore`], and the pipeline hands each transaction a
//! [`BranchStore`] so that writes made while validating it (the lazy deletion of
//! an expired trip) live and die with that transaction.
//!
//! ```text
//! ┌──────────────┐   reads fall through   ┌──────────────────────────┐
//! │ BranchStore  │ ─────────────────────▶ │ MemoryStore / SqliteStore │
//! │ (per tx)     │ ── commit(): batch ──▶ │ (committed state)         │
//! └──────────────┘                        └──────────────────────────┘
//! ```

mod branch;
mod map;
mod memory;
mod schema;
mod sqlite;

pub use branch::BranchStore;
pub use map::{BytesKey, KeyCodec, Map, StringKey};
pub use memory::MemoryStore;
pub use schema::KV_SCHEMA;
pub use sqlite::SqliteStore;

use crate::error::StoreError;

/// One buffered write: `Some(value)` sets, `None` removes.
pub type BatchOp = (Vec<u8>, Option<Vec<u8>>);

/// Ordered key-value map.
///
/// Methods take `&self`; backends use interior mutability and are shared across
/// threads, mutual exclusion being the backend's concern.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &[u8]) -> Result<(), StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Apply a batch of writes. Backends with transactions apply it atomically.
    fn apply_batch(&self, batch: &[BatchOp]) -> Result<(), StoreError> {
        for (key, value) in batch {
            match value {
                Some(value) => self.set(key, value)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }
}
