//! HTTP surface.
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | POST | `/items/` | 201 + record |
//! | GET | `/items/{id}/{city}` | 200 + record |
//! | GET | `/items/` | 200 + array of records |
//! | DELETE | `/items/{id}/{city}` | 200 + `{ok, message}` |
//! | GET | `/health` | 200 or 503 |
//!
//! `/items` without the trailing slash routes the same way. Failures are
//! described in [`error`].

pub mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};
pub use handlers::AppState;

use crate::services::ItemService;
use crate::{Error, Result};
use axum::Router;
use axum::http::header;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router around a service.
pub fn router(service: Arc<ItemService>) -> Router {
    Router::new()
        .route(
            "/items/",
            get(handlers::read_all_items).post(handlers::create_item),
        )
        .route(
            "/items",
            get(handlers::read_all_items).post(handlers::create_item),
        )
        .route(
            "/items/{id}/{city}",
            get(handlers::read_item).delete(handlers::delete_item),
        )
        .route("/health", get(handlers::health))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            header::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serves the router until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(service: Arc<ItemService>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "bind".to_string(),
            cause: format!("{addr}: {e}"),
        })?;

    tracing::info!(%addr, ready = service.is_ready(), "Starting HTTP server");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "serve".to_string(),
            cause: e.to_string(),
        })?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
