//! Item store trait.

use crate::Result;
use crate::models::{ItemKey, RawItem, Record};
use async_trait::async_trait;

/// Trait for key-value backends holding records.
///
/// Every method maps onto exactly one logical storage operation. Backends
/// do not validate what they return; callers run raw items through
/// [`validate_item`](crate::models::validate_item).
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Returns the backend name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Confirms the backing table exists and is reachable.
    async fn verify(&self) -> Result<()>;

    /// Stores a record, overwriting any record with the same key.
    async fn put(&self, record: &Record) -> Result<()>;

    /// Retrieves the raw item stored under a key.
    async fn get(&self, key: &ItemKey) -> Result<Option<RawItem>>;

    /// Returns every raw item in the table, in no particular order.
    async fn scan(&self) -> Result<Vec<RawItem>>;

    /// Deletes the item under a key if it exists.
    ///
    /// Returns `false` when no item existed, leaving the table unchanged.
    async fn delete(&self, key: &ItemKey) -> Result<bool>;
}
