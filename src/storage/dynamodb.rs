//! `DynamoDB` item store.
//!
//! Talks to a table keyed by partition key `ID` and sort key `CITY`. The
//! table must already exist; this backend never creates it.
//!
//! # Connection
//!
//! The SDK client is built from explicit settings: endpoint URL (for
//! `DynamoDB` Local), region, static credentials and table name. When no
//! access key is configured the default AWS credential chain applies.
//!
//! # Conditional delete
//!
//! Deletes carry `attribute_exists(ID) AND attribute_exists(CITY)`. A
//! `ConditionalCheckFailedException` is read from the structured SDK error
//! and reported as "did not exist"; every other failure is a storage error.

use crate::config::StorageConfig;
use crate::models::{
    CITY_ATTRIBUTE, ID_ATTRIBUTE, ItemKey, NAME_ATTRIBUTE, RawItem, Record, STATE_ATTRIBUTE,
};
use crate::storage::traits::ItemStore;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemError, DeleteItemOutput};
use aws_sdk_dynamodb::types::AttributeValue;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::collections::HashMap;

/// Condition attached to every delete.
const DELETE_CONDITION: &str = "attribute_exists(ID) AND attribute_exists(CITY)";

/// Provider name reported for statically configured credentials.
const CREDENTIALS_PROVIDER: &str = "itemstore-config";

/// Connection settings for [`DynamoDbStore`].
#[derive(Debug, Clone)]
pub struct DynamoDbSettings {
    /// Endpoint override, e.g. `http://localhost:8000` for `DynamoDB` Local.
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
    /// Static access key ID.
    pub access_key_id: Option<String>,
    /// Static secret access key.
    pub secret_access_key: Option<SecretString>,
    /// Target table name.
    pub table_name: String,
}

impl From<&StorageConfig> for DynamoDbSettings {
    fn from(config: &StorageConfig) -> Self {
        Self {
            endpoint_url: config.endpoint_url.clone(),
            region: config.region.clone(),
            access_key_id: config.access_key_id.clone(),
            secret_access_key: config.secret_access_key.clone(),
            table_name: config.table_name.clone(),
        }
    }
}

/// `DynamoDB`-backed item store.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Builds an SDK client from the given settings.
    ///
    /// No request is sent; call [`ItemStore::verify`] to check the table.
    pub async fn connect(settings: &DynamoDbSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));

        if let Some(endpoint) = settings.endpoint_url.as_deref() {
            loader = loader.endpoint_url(endpoint);
        }

        if let (Some(key_id), Some(secret)) = (
            settings.access_key_id.as_deref(),
            settings.secret_access_key.as_ref(),
        ) {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret.expose_secret(),
                None,
                None,
                CREDENTIALS_PROVIDER,
            ));
        }

        let sdk_config = loader.load().await;
        tracing::debug!(
            table = %settings.table_name,
            region = %settings.region,
            endpoint = settings.endpoint_url.as_deref().unwrap_or("default"),
            "Built DynamoDB client"
        );

        Self::with_client(Client::new(&sdk_config), settings.table_name.clone())
    }

    /// Wraps an existing SDK client.
    #[must_use]
    pub const fn with_client(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

}

#[async_trait]
impl ItemStore for DynamoDbStore {
    fn name(&self) -> &'static str {
        "dynamodb"
    }

    async fn verify(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| Error::storage("describe_table", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn put(&self, record: &Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(ID_ATTRIBUTE, AttributeValue::S(record.id.clone()))
            .item(CITY_ATTRIBUTE, AttributeValue::S(record.city.clone()))
            .item(STATE_ATTRIBUTE, AttributeValue::S(record.state.clone()))
            .item(NAME_ATTRIBUTE, AttributeValue::S(record.name.clone()))
            .send()
            .await
            .map_err(|e| Error::storage("put_item", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn get(&self, key: &ItemKey) -> Result<Option<RawItem>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, AttributeValue::S(key.id.clone()))
            .key(CITY_ATTRIBUTE, AttributeValue::S(key.city.clone()))
            .send()
            .await
            .map_err(|e| Error::storage("get_item", DisplayErrorContext(&e)))?;

        Ok(output.item().map(item_to_raw))
    }

    async fn scan(&self) -> Result<Vec<RawItem>> {
        let mut pages = self
            .client
            .scan()
            .table_name(&self.table_name)
            .into_paginator()
            .items()
            .send();

        let mut items = Vec::new();
        while let Some(item) = pages
            .try_next()
            .await
            .map_err(|e| Error::storage("scan", DisplayErrorContext(&e)))?
        {
            items.push(item_to_raw(&item));
        }
        Ok(items)
    }

    async fn delete(&self, key: &ItemKey) -> Result<bool> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, AttributeValue::S(key.id.clone()))
            .key(CITY_ATTRIBUTE, AttributeValue::S(key.city.clone()))
            .condition_expression(DELETE_CONDITION)
            .send()
            .await;

        delete_outcome(result)
    }
}

/// Maps a conditional delete response to "existed" or "did not exist".
///
/// Only `ConditionalCheckFailedException` means the item was absent.
fn delete_outcome<R>(
    result: std::result::Result<DeleteItemOutput, SdkError<DeleteItemError, R>>,
) -> Result<bool>
where
    R: std::fmt::Debug,
{
    match result {
        Ok(_) => Ok(true),
        Err(e)
            if e.as_service_error()
                .is_some_and(DeleteItemError::is_conditional_check_failed_exception) =>
        {
            Ok(false)
        },
        Err(e) => Err(Error::storage("delete_item", DisplayErrorContext(&e))),
    }
}

/// Converts a `DynamoDB` attribute map into a raw item.
fn item_to_raw(item: &HashMap<String, AttributeValue>) -> RawItem {
    item.iter()
        .map(|(name, value)| (name.clone(), attribute_to_json(value)))
        .collect()
}

/// Converts one attribute value into JSON.
///
/// Only `S` becomes a JSON string, so anything else stored under a record
/// field fails validation. Binary values have no JSON form and map to null.
fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::L(list) => Value::Array(list.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(item_to_raw(map)),
        AttributeValue::Ss(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => {
            Value::Array(set.iter().map(String::as_str).map(number_to_json).collect())
        },
        _ => Value::Null,
    }
}

fn number_to_json(n: &str) -> Value {
    serde_json::from_str::<serde_json::Number>(n).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_item;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ResourceNotFoundException,
    };
    use serde_json::json;

    fn stored(pairs: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_string_item_validates() {
        let item = stored(&[
            ("ID", AttributeValue::S("123".to_string())),
            ("CITY", AttributeValue::S("Seattle".to_string())),
            ("state", AttributeValue::S("WA".to_string())),
            ("name", AttributeValue::S("Widget".to_string())),
        ]);

        let record = validate_item(&item_to_raw(&item));
        assert!(matches!(
            record,
            Ok(ref r) if *r == Record::new("123", "Seattle", "WA", "Widget")
        ));
    }

    #[test]
    fn test_numeric_attribute_fails_validation() {
        let item = stored(&[
            ("ID", AttributeValue::N("123".to_string())),
            ("CITY", AttributeValue::S("Seattle".to_string())),
            ("state", AttributeValue::S("WA".to_string())),
            ("name", AttributeValue::S("Widget".to_string())),
        ]);

        let raw = item_to_raw(&item);
        assert_eq!(raw.get("ID"), Some(&json!(123)));
        assert!(matches!(
            validate_item(&raw),
            Err(Error::InvalidShape { ref field }) if field == ID_ATTRIBUTE
        ));
    }

    #[test]
    fn test_nested_attributes_convert() {
        let value = AttributeValue::M(stored(&[
            ("flag", AttributeValue::Bool(true)),
            ("none", AttributeValue::Null(true)),
            (
                "list",
                AttributeValue::L(vec![
                    AttributeValue::S("a".to_string()),
                    AttributeValue::N("1.5".to_string()),
                ]),
            ),
            ("tags", AttributeValue::Ss(vec!["x".to_string()])),
        ]));

        assert_eq!(
            attribute_to_json(&value),
            json!({"flag": true, "none": null, "list": ["a", 1.5], "tags": ["x"]})
        );
    }

    #[test]
    fn test_unparseable_number_is_null() {
        assert_eq!(number_to_json("not-a-number"), Value::Null);
    }

    #[test]
    fn test_delete_condition_names_key_attributes() {
        assert!(DELETE_CONDITION.contains(ID_ATTRIBUTE));
        assert!(DELETE_CONDITION.contains(CITY_ATTRIBUTE));
    }

    fn service_error(err: DeleteItemError) -> SdkError<DeleteItemError, ()> {
        SdkError::service_error(err, ())
    }

    #[test]
    fn test_delete_outcome_success_means_existed() {
        let outcome = delete_outcome::<()>(Ok(DeleteItemOutput::builder().build()));
        assert!(matches!(outcome, Ok(true)));
    }

    #[test]
    fn test_delete_outcome_failed_condition_means_absent() {
        let err = DeleteItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder()
                .message("The conditional request failed")
                .build(),
        );
        assert!(matches!(delete_outcome(Err(service_error(err))), Ok(false)));
    }

    #[test]
    fn test_delete_outcome_other_service_error_is_storage_failure() {
        let err = DeleteItemError::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message("Requested resource not found")
                .build(),
        );
        assert!(matches!(
            delete_outcome(Err(service_error(err))),
            Err(Error::StorageFailure { ref operation, ref cause })
                if operation == "delete_item" && cause.contains("ResourceNotFoundException")
        ));
    }

    #[test]
    fn test_delete_outcome_transport_error_is_storage_failure() {
        let err: SdkError<DeleteItemError, ()> = SdkError::timeout_error("timed out");
        assert!(matches!(
            delete_outcome(Err(err)),
            Err(Error::StorageFailure { .. })
        ));
    }
}
