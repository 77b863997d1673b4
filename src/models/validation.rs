//! Record shape validation.
//!
//! Untyped input enters the process in two places: HTTP request bodies and
//! raw items read back from storage. Both pass through here before anything
//! else sees them. A candidate is accepted only when all four fields are
//! present and are strings; extra fields are ignored.
//!
//! The two boundaries name fields differently. Request bodies use the
//! lowercase wire names and accept the stored names `ID` and `CITY` as
//! aliases. Stored items are read by their attribute names only, so a stray
//! lowercase attribute can never stand in for a key attribute.

use super::record::{
    CITY_ATTRIBUTE, ID_ATTRIBUTE, NAME_ATTRIBUTE, RawItem, Record, STATE_ATTRIBUTE,
};
use crate::{Error, Result};
use serde_json::Value;

/// Wire name and stored attribute name of each record field, in check order.
const FIELDS: [(&str, &str); 4] = [
    ("id", ID_ATTRIBUTE),
    ("city", CITY_ATTRIBUTE),
    ("state", STATE_ATTRIBUTE),
    ("name", NAME_ATTRIBUTE),
];

/// Validates an HTTP request body into a [`Record`].
///
/// # Errors
///
/// Returns [`Error::InvalidShape`] if the value is not an object, or if any
/// field is missing or not a string. The error names the wire field.
pub fn validate(candidate: &Value) -> Result<Record> {
    let Value::Object(map) = candidate else {
        return Err(Error::InvalidShape {
            field: "body".to_string(),
        });
    };
    let [id, city, state, name] = FIELDS.map(|(wire, stored)| {
        let value = map.get(wire).or_else(|| map.get(stored));
        string_value(value, wire)
    });
    assemble(id, city, state, name)
}

/// Validates a raw item read from storage into a [`Record`].
///
/// Only the stored attribute names are consulted.
///
/// # Errors
///
/// Returns [`Error::InvalidShape`] naming the first missing or non-string
/// attribute.
pub fn validate_item(item: &RawItem) -> Result<Record> {
    let [id, city, state, name] =
        FIELDS.map(|(_, stored)| string_value(item.get(stored), stored));
    assemble(id, city, state, name)
}

fn string_value(value: Option<&Value>, field: &str) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(Error::InvalidShape {
            field: field.to_string(),
        }),
    }
}

fn assemble(
    id: Result<String>,
    city: Result<String>,
    state: Result<String>,
    name: Result<String>,
) -> Result<Record> {
    Ok(Record {
        id: id?,
        city: city?,
        state: state?,
        name: name?,
    })
}
