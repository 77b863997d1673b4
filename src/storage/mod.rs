//! Storage layer abstraction.
//!
//! The service talks to one key-value table through the [`ItemStore`]
//! trait. Two backends implement it:
//! - **`DynamoDB`**: the production table, keyed by (`ID`, `CITY`)
//! - **Memory**: a process-local map for development and tests
//!
//! Backends deal in [`RawItem`]s. Turning a raw item into a
//! [`Record`](crate::models::Record) is the validator's job, not the
//! backend's.

mod dynamodb;
mod memory;
mod traits;

pub use dynamodb::{DynamoDbSettings, DynamoDbStore};
pub use memory::MemoryStore;
pub use traits::ItemStore;

use crate::config::{StorageBackendKind, StorageConfig};
use std::sync::Arc;

/// Builds the configured storage backend.
///
/// Building never fails; reachability is checked later by
/// [`ItemStore::verify`].
pub async fn build_store(config: &StorageConfig) -> Arc<dyn ItemStore> {
    match config.backend {
        StorageBackendKind::DynamoDb => {
            let settings = DynamoDbSettings::from(config);
            Arc::new(DynamoDbStore::connect(&settings).await)
        },
        StorageBackendKind::Memory => Arc::new(MemoryStore::new()),
    }
}
