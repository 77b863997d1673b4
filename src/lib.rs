//! # Itemstore
//!
//! A small HTTP service for create, read, list and delete operations over a
//! single key-value table addressed by a composite `(id, city)` key.
//!
//! Each endpoint maps onto exactly one storage call. Inbound bodies and raw
//! stored items pass through the record validator, and storage outcomes are
//! translated into typed errors before they reach the caller.
//!
//! ## Layout
//!
//! - [`models`]: the [`Record`] entity, its composite [`ItemKey`] and the
//!   string-only shape validator
//! - [`storage`]: the [`ItemStore`] trait with `DynamoDB` and in-memory backends
//! - [`services`]: [`ItemService`], which owns the connection state machine
//! - [`http`]: the axum router and error-to-status translation
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use itemstore::{ItemService, MemoryStore, Record};
//!
//! let service = ItemService::connect(Arc::new(MemoryStore::new())).await;
//! let record = Record::new("123", "Seattle", "WA", "Widget");
//! service.create(record.clone()).await?;
//! assert_eq!(service.get(&record.key()).await?, record);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// The AWS SDK pulls several versions of the same transitive crates.
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod http;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::{ItemstoreConfig, StorageBackendKind};
pub use models::{DeleteConfirmation, ItemKey, RawItem, Record};
pub use services::ItemService;
pub use storage::{DynamoDbStore, ItemStore, MemoryStore};

/// Message returned for every record shape violation.
pub const SHAPE_ERROR_MESSAGE: &str =
    "please check the input values please enter string values only";

/// Error type for itemstore operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When | HTTP status |
/// |---------|-------------|-------------|
/// | `InvalidShape` | A record field is missing or not a string | 422 |
/// | `StorageUnavailable` | The startup table check failed | 503 |
/// | `NotFound` | No record exists for the composite key | 404 |
/// | `StorageFailure` | Any other error from the storage engine | 500 |
/// | `InvalidInput` | A configuration or CLI value cannot be parsed | 500 |
/// | `OperationFailed` | Startup, I/O or serving fails | 500 |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A record failed shape validation.
    ///
    /// Raised before any storage call is made, or when a stored item read
    /// back from the table is malformed.
    #[error("{}", SHAPE_ERROR_MESSAGE)]
    InvalidShape {
        /// The first field that was missing or not a string.
        field: String,
    },

    /// The storage handle is not available.
    ///
    /// Raised for every operation once the startup verification failed.
    /// Recovery requires a process restart.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The addressed record does not exist.
    ///
    /// Carries the client-facing detail message.
    #[error("{0}")]
    NotFound(String),

    /// The storage engine returned an unexpected error.
    ///
    /// Raised when:
    /// - the request is throttled or malformed
    /// - a network fault interrupts the call
    /// - a stored item fails re-validation
    #[error("storage operation '{operation}' failed: {cause}")]
    StorageFailure {
        /// The storage operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid configuration or command-line input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - the configuration file cannot be read or parsed
    /// - the HTTP listener cannot bind
    /// - logging or metrics initialization fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds a [`Error::StorageFailure`] from any displayable cause.
    pub fn storage(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::StorageFailure {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Returns a short label used for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidShape { .. } => "invalid_shape",
            Self::StorageUnavailable(_) => "unavailable",
            Self::NotFound(_) => "not_found",
            Self::StorageFailure { .. } => "storage_failure",
            Self::InvalidInput(_) => "invalid_input",
            Self::OperationFailed { .. } => "operation_failed",
        }
    }
}

/// Result type alias for itemstore operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidShape {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), SHAPE_ERROR_MESSAGE);
        assert_eq!(
            err.to_string(),
            "please check the input values please enter string values only"
        );

        let err = Error::NotFound("Item not found".to_string());
        assert_eq!(err.to_string(), "Item not found");

        let err = Error::storage("scan", "throttled");
        assert_eq!(err.to_string(), "storage operation 'scan' failed: throttled");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::StorageUnavailable("gone".to_string()).kind(),
            "unavailable"
        );
        assert_eq!(Error::InvalidInput("x".to_string()).kind(), "invalid_input");
    }
}
