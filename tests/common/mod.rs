//! Shared helpers for integration tests.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use itemstore::models::{ItemKey, RawItem, Record};
use itemstore::storage::{ItemStore, MemoryStore};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

/// Wraps a [`MemoryStore`] and counts every data-path call.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of put/get/scan/delete calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemStore for CountingStore {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn verify(&self) -> itemstore::Result<()> {
        self.inner.verify().await
    }

    async fn put(&self, record: &Record) -> itemstore::Result<()> {
        self.tick();
        self.inner.put(record).await
    }

    async fn get(&self, key: &ItemKey) -> itemstore::Result<Option<RawItem>> {
        self.tick();
        self.inner.get(key).await
    }

    async fn scan(&self) -> itemstore::Result<Vec<RawItem>> {
        self.tick();
        self.inner.scan().await
    }

    async fn delete(&self, key: &ItemKey) -> itemstore::Result<bool> {
        self.tick();
        self.inner.delete(key).await
    }
}

/// Store whose table check always fails and whose data calls are counted.
#[derive(Default)]
pub struct MissingTableStore {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ItemStore for MissingTableStore {
    fn name(&self) -> &'static str {
        "missing-table"
    }

    async fn verify(&self) -> itemstore::Result<()> {
        Err(itemstore::Error::storage(
            "describe_table",
            "ResourceNotFoundException: Cannot do operations on a non-existent table",
        ))
    }

    async fn put(&self, _record: &Record) -> itemstore::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, _key: &ItemKey) -> itemstore::Result<Option<RawItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn scan(&self) -> itemstore::Result<Vec<RawItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn delete(&self, _key: &ItemKey) -> itemstore::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }
}

pub fn widget() -> Record {
    Record::new("123", "Seattle", "WA", "Widget")
}

/// Sends one request through the router and returns status plus JSON body.
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    (status, body_json(response).await)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body should be readable");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Builds a router over a ready service backed by `store`.
pub fn router_over(store: Arc<dyn ItemStore>) -> Router {
    itemstore::http::router(Arc::new(itemstore::ItemService::ready(store)))
}
