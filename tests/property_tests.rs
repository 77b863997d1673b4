//! Property-based tests for record validation and service semantics.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Any four strings validate into the same record
//! - Create then get returns the created record
//! - A second create with the same key overwrites the first
//! - Any non-string field is rejected before storage is touched

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use common::{CountingStore, router_over, send};
use itemstore::models::{Record, validate};
use itemstore::{Error, ItemService};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn any_record() -> impl Strategy<Value = Record> {
    (".{0,24}", ".{0,24}", ".{0,24}", ".{0,24}")
        .prop_map(|(id, city, state, name)| Record::new(id, city, state, name))
}

fn non_string() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        Just(Value::Null),
        ".{0,8}".prop_map(|s| json!([s])),
        ".{0,8}".prop_map(|s| json!({"v": s})),
    ]
}

proptest! {
    /// Property: a JSON object of four strings validates to the same record.
    #[test]
    fn prop_string_fields_validate(record in any_record()) {
        let value = serde_json::to_value(&record).unwrap();
        let validated = validate(&value).unwrap();
        prop_assert_eq!(validated, record);
    }

    /// Property: get after create returns the created record.
    #[test]
    fn prop_create_then_get(record in any_record()) {
        let service = ItemService::ready(Arc::new(CountingStore::new()));
        let fetched = runtime().block_on(async {
            service.create(record.clone()).await?;
            service.get(&record.key()).await
        });
        prop_assert_eq!(fetched.unwrap(), record);
    }

    /// Property: a second create with the same key replaces the first.
    #[test]
    fn prop_create_overwrites(first in any_record(), state in ".{0,24}", name in ".{0,24}") {
        let second = Record::new(first.id.clone(), first.city.clone(), state, name);
        let service = ItemService::ready(Arc::new(CountingStore::new()));
        let (fetched, all) = runtime().block_on(async {
            service.create(first.clone()).await?;
            service.create(second.clone()).await?;
            let fetched = service.get(&first.key()).await?;
            let all = service.list().await?;
            Ok::<_, Error>((fetched, all))
        }).unwrap();

        prop_assert_eq!(fetched, second);
        prop_assert_eq!(all.len(), 1);
    }

    /// Property: a non-string in any field is rejected with no storage call.
    #[test]
    fn prop_non_string_rejected(
        record in any_record(),
        bad in non_string(),
        field in prop::sample::select(vec!["id", "city", "state", "name"]),
    ) {
        let mut value = serde_json::to_value(&record).unwrap();
        value[field] = bad;

        let err = validate(&value).unwrap_err();
        prop_assert!(
            matches!(err, Error::InvalidShape { field: ref f } if f == field),
            "unexpected error: {:?}", err
        );

        let store = Arc::new(CountingStore::new());
        let router = router_over(store.clone());
        let body = value.to_string();
        let (status, response) =
            runtime().block_on(send(&router, "POST", "/items/", Some(body.as_str())));

        prop_assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        prop_assert_eq!(&response["field"], &json!(field));
        prop_assert_eq!(store.calls(), 0);
    }

    /// Property: delete after create succeeds once, then reports not found.
    #[test]
    fn prop_delete_once(record in any_record()) {
        let store = Arc::new(CountingStore::new());
        let service = ItemService::ready(store.clone());
        let (first, second, after) = runtime().block_on(async {
            service.create(record.clone()).await.unwrap();
            let first = service.delete(&record.key()).await;
            let second = service.delete(&record.key()).await;
            let after = service.get(&record.key()).await;
            (first, second, after)
        });

        prop_assert!(first.is_ok());
        prop_assert!(matches!(second, Err(Error::NotFound(_))));
        prop_assert!(matches!(after, Err(Error::NotFound(_))));
        prop_assert_eq!(store.calls(), 4);
    }
}
