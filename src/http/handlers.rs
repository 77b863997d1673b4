//! Request handlers for the `/items` routes.

use super::error::ApiError;
use crate::models::{DeleteConfirmation, ItemKey, Record, validate};
use crate::services::ItemService;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

/// Shared handler state.
pub type AppState = Arc<ItemService>;

/// `POST /items/`
///
/// The body is shape-checked before the service, and therefore storage,
/// is touched.
pub async fn create_item(
    State(service): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let Json(candidate) = body.map_err(|e| ApiError::from_rejection(&e))?;
    let record = validate(&candidate)?;
    let record = service.create(record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /items/{id}/{city}`
pub async fn read_item(
    State(service): State<AppState>,
    Path((id, city)): Path<(String, String)>,
) -> Result<Json<Record>, ApiError> {
    let record = service.get(&ItemKey::new(id, city)).await?;
    Ok(Json(record))
}

/// `GET /items/`
pub async fn read_all_items(
    State(service): State<AppState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(service.list().await?))
}

/// `DELETE /items/{id}/{city}`
pub async fn delete_item(
    State(service): State<AppState>,
    Path((id, city)): Path<(String, String)>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let confirmation = service.delete(&ItemKey::new(id, city)).await?;
    Ok(Json(confirmation))
}

/// `GET /health`
///
/// Reports whether the startup storage check succeeded. No storage call is
/// made.
pub async fn health(State(service): State<AppState>) -> (StatusCode, Json<Value>) {
    if service.is_ready() {
        (StatusCode::OK, Json(json!({"status": "ok"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "unavailable"})),
        )
    }
}
