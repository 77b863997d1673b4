//! Translation of errors into HTTP responses.
//!
//! Every failure becomes a status code plus a `{"detail": ...}` body.
//!
//! | Error | Status |
//! |-------|--------|
//! | `InvalidShape`, malformed JSON body | 422 |
//! | `NotFound` | 404 |
//! | `StorageUnavailable` | 503 |
//! | `StorageFailure` and everything else | 500 |

use crate::Error;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Detail sent for every unavailable-storage response.
const UNAVAILABLE_DETAIL: &str = "Database connection not available";

/// Error body returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub detail: String,
    /// Offending field, for shape errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// An HTTP-facing failure.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response body.
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Builds the response for a body that could not be decoded as JSON.
    #[must_use]
    pub fn from_rejection(rejection: &JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody {
                detail: rejection.body_text(),
                field: Some("body".to_string()),
            },
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, detail, field) = match err {
            Error::InvalidShape { field } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                crate::SHAPE_ERROR_MESSAGE.to_string(),
                Some(field),
            ),
            Error::NotFound(detail) => (StatusCode::NOT_FOUND, detail, None),
            Error::StorageUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                UNAVAILABLE_DETAIL.to_string(),
                None,
            ),
            Error::StorageFailure { cause, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An unexpected error occurred: {cause}"),
                None,
            ),
            other @ (Error::InvalidInput(_) | Error::OperationFailed { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An unexpected error occurred: {other}"),
                None,
            ),
        };

        Self {
            status,
            body: ErrorBody { detail, field },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                Error::InvalidShape {
                    field: "id".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (Error::NotFound("gone".to_string()), StatusCode::NOT_FOUND),
            (
                Error::StorageUnavailable("no table".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                Error::storage("delete_item", "throttled"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                Error::InvalidInput("bad".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_unavailable_hides_cause() {
        let err = ApiError::from(Error::StorageUnavailable("secret endpoint".to_string()));
        assert_eq!(err.body().detail, "Database connection not available");
    }

    #[test]
    fn test_storage_failure_carries_cause() {
        let err = ApiError::from(Error::storage("delete_item", "ThrottlingException"));
        assert_eq!(
            err.body().detail,
            "An unexpected error occurred: ThrottlingException"
        );
        assert!(err.body().field.is_none());
    }

    #[test]
    fn test_shape_error_names_field() {
        let err = ApiError::from(Error::InvalidShape {
            field: "city".to_string(),
        });
        assert_eq!(err.body().field.as_deref(), Some("city"));
        assert_eq!(err.body().detail, crate::SHAPE_ERROR_MESSAGE);
    }
}
