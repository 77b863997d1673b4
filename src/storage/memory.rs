//! In-memory item store.
//!
//! Provides a non-persistent implementation of [`ItemStore`] for local
//! development (`--backend memory`) and tests. Data is lost on exit.

use crate::models::{ItemKey, RawItem, Record};
use crate::storage::traits::ItemStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory item store.
///
/// Uses `RwLock` for thread-safe access with reader-writer semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<ItemKey, RawItem>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored items.
    ///
    /// Reports zero if the lock is poisoned. Data-path calls return
    /// [`Error::StorageFailure`] in that state instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().map(|i| i.len()).unwrap_or(0)
    }

    /// Returns true if the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a raw item under a key without any shape checks.
    ///
    /// Lets tests plant malformed data the way a foreign writer could.
    pub fn insert_raw(&self, key: ItemKey, item: RawItem) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned("insert_raw"))?;
        items.insert(key, item);
        Ok(())
    }
}

fn poisoned(operation: &str) -> Error {
    Error::storage(operation, "Lock poisoned")
}

#[async_trait]
impl ItemStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn verify(&self) -> Result<()> {
        Ok(())
    }

    async fn put(&self, record: &Record) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned("put_item"))?;
        items.insert(record.key(), record.to_item());
        Ok(())
    }

    async fn get(&self, key: &ItemKey) -> Result<Option<RawItem>> {
        let items = self.items.read().map_err(|_| poisoned("get_item"))?;
        Ok(items.get(key).cloned())
    }

    async fn scan(&self) -> Result<Vec<RawItem>> {
        let items = self.items.read().map_err(|_| poisoned("scan"))?;
        Ok(items.values().cloned().collect())
    }

    async fn delete(&self, key: &ItemKey) -> Result<bool> {
        let mut items = self.items.write().map_err(|_| poisoned("delete_item"))?;
        Ok(items.remove(key).is_some())
    }
}
