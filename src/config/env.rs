//! Environment variable overrides.

use super::{ItemstoreConfig, StorageBackendKind, parse_bind};
use secrecy::SecretString;

/// Listen address.
pub const ENV_BIND: &str = "ITEMSTORE_BIND";
/// Storage backend name.
pub const ENV_BACKEND: &str = "ITEMSTORE_STORAGE_BACKEND";
/// `DynamoDB` endpoint URL; empty clears the override.
pub const ENV_ENDPOINT_URL: &str = "ITEMSTORE_DYNAMODB_ENDPOINT_URL";
/// AWS region.
pub const ENV_REGION: &str = "ITEMSTORE_DYNAMODB_REGION";
/// Static access key ID.
pub const ENV_ACCESS_KEY_ID: &str = "ITEMSTORE_DYNAMODB_ACCESS_KEY_ID";
/// Static secret access key.
pub const ENV_SECRET_ACCESS_KEY: &str = "ITEMSTORE_DYNAMODB_SECRET_ACCESS_KEY";
/// Table name.
pub const ENV_TABLE_NAME: &str = "ITEMSTORE_TABLE_NAME";
/// Log format.
pub const ENV_LOG_FORMAT: &str = "ITEMSTORE_LOG_FORMAT";
/// Log filter directive.
pub const ENV_LOG_LEVEL: &str = "ITEMSTORE_LOG_LEVEL";
/// Metrics toggle.
pub const ENV_METRICS_ENABLED: &str = "ITEMSTORE_METRICS_ENABLED";
/// Metrics listener port.
pub const ENV_METRICS_PORT: &str = "ITEMSTORE_METRICS_PORT";

/// Applies overrides read through `lookup`.
///
/// Blank values are treated as unset, except for the endpoint URL where a
/// blank value removes the endpoint override.
pub fn apply_overrides<F>(config: &mut ItemstoreConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(bind) = get(ENV_BIND) {
        match parse_bind(&bind) {
            Ok(addr) => config.server.bind = addr,
            Err(e) => tracing::warn!(var = ENV_BIND, error = %e, "Ignoring invalid value"),
        }
    }
    if let Some(backend) = get(ENV_BACKEND) {
        match StorageBackendKind::parse(&backend) {
            Ok(kind) => config.storage.backend = kind,
            Err(e) => tracing::warn!(var = ENV_BACKEND, error = %e, "Ignoring invalid value"),
        }
    }
    if let Some(endpoint) = lookup(ENV_ENDPOINT_URL) {
        config.storage.endpoint_url = Some(endpoint).filter(|v| !v.trim().is_empty());
    }
    if let Some(region) = get(ENV_REGION) {
        config.storage.region = region;
    }
    if let Some(key_id) = get(ENV_ACCESS_KEY_ID) {
        config.storage.access_key_id = Some(key_id);
    }
    if let Some(secret) = get(ENV_SECRET_ACCESS_KEY) {
        config.storage.secret_access_key = Some(SecretString::from(secret));
    }
    if let Some(table) = get(ENV_TABLE_NAME) {
        config.storage.table_name = table;
    }
    if let Some(format) = get(ENV_LOG_FORMAT) {
        config.logging.format = Some(format);
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.level = Some(level);
    }
    if let Some(enabled) = get(ENV_METRICS_ENABLED) {
        match parse_bool(&enabled) {
            Some(v) => config.metrics.enabled = v,
            None => {
                tracing::warn!(
                    var = ENV_METRICS_ENABLED,
                    value = %enabled,
                    "Ignoring invalid value"
                );
            },
        }
    }
    if let Some(port) = get(ENV_METRICS_PORT) {
        match port.trim().parse() {
            Ok(p) => config.metrics.port = p,
            Err(_) => {
                tracing::warn!(var = ENV_METRICS_PORT, value = %port, "Ignoring invalid value");
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
