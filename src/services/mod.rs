//! Business logic services.
//!
//! Services sit between the HTTP surface and the storage backends.

mod item;

pub use item::ItemService;
