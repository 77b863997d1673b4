//! Item service.
//!
//! Bridges requests to exactly one storage call each and translates the
//! outcome into a [`Record`] or a typed [`Error`].
//!
//! # Connection state
//!
//! The store handle is checked once, when the service is built:
//!
//! | State | Reached when | Operations |
//! |-------|--------------|------------|
//! | Ready | [`ItemStore::verify`] succeeded | execute |
//! | Unavailable | verification failed, or [`ItemService::unavailable`] | fail with [`Error::StorageUnavailable`], no storage call |
//!
//! There is no transition out of Unavailable; recovery needs a restart.

use crate::models::{DeleteConfirmation, ItemKey, RawItem, Record, validate_item};
use crate::storage::ItemStore;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Connection state of the storage handle.
enum StoreState {
    Ready(Arc<dyn ItemStore>),
    Unavailable { cause: String },
}

/// Service exposing create, get, list and delete over one item store.
pub struct ItemService {
    state: StoreState,
}

impl ItemService {
    /// Verifies the store and builds the service.
    ///
    /// A failed verification is logged and leaves the service Unavailable
    /// rather than returning an error, so the HTTP surface still answers
    /// with 503.
    pub async fn connect(store: Arc<dyn ItemStore>) -> Self {
        tracing::info!(backend = store.name(), "Connecting to item store");

        match store.verify().await {
            Ok(()) => {
                tracing::info!(backend = store.name(), "Connected to item store");
                metrics::gauge!("item_store_ready").set(1.0);
                Self {
                    state: StoreState::Ready(store),
                }
            },
            Err(e) => {
                tracing::error!(
                    backend = store.name(),
                    error = %e,
                    "Item store verification failed; ensure the table exists"
                );
                metrics::gauge!("item_store_ready").set(0.0);
                Self::unavailable(e.to_string())
            },
        }
    }

    /// Builds a service around a store without verifying it.
    #[must_use]
    pub fn ready(store: Arc<dyn ItemStore>) -> Self {
        Self {
            state: StoreState::Ready(store),
        }
    }

    /// Builds a service in the Unavailable state.
    #[must_use]
    pub fn unavailable(cause: impl Into<String>) -> Self {
        Self {
            state: StoreState::Unavailable {
                cause: cause.into(),
            },
        }
    }

    /// Returns true if operations can reach the store.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, StoreState::Ready(_))
    }

    /// Returns the recorded cause when the store is unavailable.
    #[must_use]
    pub fn unavailable_cause(&self) -> Option<&str> {
        match &self.state {
            StoreState::Ready(_) => None,
            StoreState::Unavailable { cause } => Some(cause),
        }
    }

    fn store(&self) -> Result<&dyn ItemStore> {
        match &self.state {
            StoreState::Ready(store) => Ok(store.as_ref()),
            StoreState::Unavailable { cause } => Err(Error::StorageUnavailable(cause.clone())),
        }
    }

    /// Stores a record, silently overwriting any record with the same key.
    ///
    /// Returns the input record; it is not re-read from storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] or [`Error::StorageFailure`].
    #[instrument(skip(self, record), fields(id = %record.id, city = %record.city))]
    pub async fn create(&self, record: Record) -> Result<Record> {
        let start = Instant::now();
        let result: Result<Record> = async {
            self.store()?.put(&record).await?;
            Ok(record)
        }
        .await;
        record_outcome("create", start, &result);
        result
    }

    /// Looks up a record by composite key.
    ///
    /// The stored item is re-validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record exists, or
    /// [`Error::StorageFailure`] if the stored item is malformed.
    #[instrument(skip(self), fields(id = %key.id, city = %key.city))]
    pub async fn get(&self, key: &ItemKey) -> Result<Record> {
        let start = Instant::now();
        let result: Result<Record> = async {
            let item = self
                .store()?
                .get(key)
                .await?
                .ok_or_else(|| Error::NotFound("Item not found".to_string()))?;
            stored_record("get_item", &item)
        }
        .await;
        record_outcome("get", start, &result);
        result
    }

    /// Returns every record in the table, in no particular order.
    ///
    /// This is a full scan. One malformed stored item fails the whole call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageFailure`] if the scan fails or any stored
    /// item is malformed.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Record>> {
        let start = Instant::now();
        let result: Result<Vec<Record>> = async {
            let items = self.store()?.scan().await?;
            items
                .iter()
                .map(|item| stored_record("scan", item))
                .collect::<Result<Vec<_>>>()
        }
        .await;
        if let Ok(records) = &result {
            tracing::debug!(count = records.len(), "Listed items");
        }
        record_outcome("list", start, &result);
        result
    }

    /// Deletes a record only if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no record exists for the key, and
    /// [`Error::StorageFailure`] for any other storage error.
    #[instrument(skip(self), fields(id = %key.id, city = %key.city))]
    pub async fn delete(&self, key: &ItemKey) -> Result<DeleteConfirmation> {
        let start = Instant::now();
        let result: Result<DeleteConfirmation> = async {
            if self.store()?.delete(key).await? {
                tracing::info!("Deleted item");
                Ok(DeleteConfirmation::for_key(key))
            } else {
                Err(Error::NotFound(format!(
                    "Item with ID '{}' and City '{}' not found.",
                    key.id, key.city
                )))
            }
        }
        .await;
        record_outcome("delete", start, &result);
        result
    }
}

/// Re-validates a stored item.
///
/// Malformed stored data is a storage fault, not a client error.
fn stored_record(operation: &str, item: &RawItem) -> Result<Record> {
    validate_item(item).map_err(|e| match e {
        Error::InvalidShape { field } => Error::storage(
            operation,
            format!("stored item has a missing or non-string '{field}' field"),
        ),
        other => other,
    })
}

fn record_outcome<T>(operation: &'static str, start: Instant, result: &Result<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => {
            if matches!(e, Error::StorageFailure { .. }) {
                tracing::warn!(operation, error = %e, "Storage operation failed");
            }
            e.kind()
        },
    };
    metrics::counter!(
        "item_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("item_operation_duration_ms", "operation" => operation)
        .record(start.elapsed().as_secs_f64() * 1000.0);
}
