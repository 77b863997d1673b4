//! Data models for itemstore.
//!
//! A single entity lives here: the [`Record`], addressed by its composite
//! [`ItemKey`]. The [`validation`] submodule turns untyped values into
//! records at the process boundary.

mod record;
pub mod validation;

pub use record::{
    CITY_ATTRIBUTE, DeleteConfirmation, ID_ATTRIBUTE, ItemKey, NAME_ATTRIBUTE, RawItem, Record,
    STATE_ATTRIBUTE,
};
pub use validation::{validate, validate_item};
