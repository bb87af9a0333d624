//! Inventory domain module.
//!
//! Part vocabulary, stock keys and the in-memory store that owns every stock
//! mutation. Pure domain logic: no IO, no HTTP.

pub mod catalog;
pub mod part;
pub mod store;

pub use part::{
    BackplateLabel, BatteryCapacity, ColoredPartKind, Condition, Generation, GenerationFamily,
    PartCategory, StockKey, StorageKind, Thickness, generation_family,
};
pub use store::{InventoryStore, StockLedger, StockLevel, StockLevels};
