//! Record types and composite keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Stored attribute name of the partition key.
pub const ID_ATTRIBUTE: &str = "ID";

/// Stored attribute name of the sort key.
pub const CITY_ATTRIBUTE: &str = "CITY";

/// Stored attribute name of the state field.
pub const STATE_ATTRIBUTE: &str = "state";

/// Stored attribute name of the name field.
pub const NAME_ATTRIBUTE: &str = "name";

/// An untyped item as read from (or written to) a storage backend.
///
/// Keys are stored attribute names; values are whatever the backend holds.
pub type RawItem = serde_json::Map<String, Value>;

/// Composite primary key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Partition component.
    pub id: String,
    /// Sort component.
    pub city: String,
}

impl ItemKey {
    /// Creates a new composite key.
    #[must_use]
    pub fn new(id: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            city: city.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.city)
    }
}

/// The single entity managed by the service.
///
/// All four fields are plain strings. `(id, city)` is the composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Item identifier.
    pub id: String,
    /// City the item belongs to.
    pub city: String,
    /// Free-form state field.
    pub state: String,
    /// Free-form display name.
    pub name: String,
}

impl Record {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            city: city.into(),
            state: state.into(),
            name: name.into(),
        }
    }

    /// Returns the composite key of this record.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.id.clone(), self.city.clone())
    }

    /// Converts the record into its stored attribute layout.
    #[must_use]
    pub fn to_item(&self) -> RawItem {
        let mut item = RawItem::new();
        item.insert(ID_ATTRIBUTE.to_string(), Value::String(self.id.clone()));
        item.insert(CITY_ATTRIBUTE.to_string(), Value::String(self.city.clone()));
        item.insert(STATE_ATTRIBUTE.to_string(), Value::String(self.state.clone()));
        item.insert(NAME_ATTRIBUTE.to_string(), Value::String(self.name.clone()));
        item
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// Always `true`.
    pub ok: bool,
    /// Human-readable confirmation naming the deleted key.
    pub message: String,
}

impl DeleteConfirmation {
    /// Builds the confirmation for a deleted key.
    #[must_use]
    pub fn for_key(key: &ItemKey) -> Self {
        Self {
            ok: true,
            message: format!(
                "Item with ID '{}' and City '{}' deleted successfully.",
                key.id, key.city
            ),
        }
    }
}
