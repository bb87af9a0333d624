use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use podforge_core::{DomainError, DomainResult};

use crate::catalog;
use crate::part::{Condition, PartCategory, StockKey};

/// Read access to stock quantities.
///
/// Implemented by the live store, by the locked ledger inside a transaction,
/// and by plain snapshots, so rule evaluation never needs a store.
pub trait StockLevels {
    /// Quantity on hand; unknown keys are 0.
    fn quantity_of(&self, key: &StockKey) -> u32;

    /// Keys with a positive quantity, in stock-key order.
    fn in_stock(&self) -> Vec<StockKey>;
}

impl StockLevels for BTreeMap<StockKey, u32> {
    fn quantity_of(&self, key: &StockKey) -> u32 {
        self.get(key).copied().unwrap_or(0)
    }

    fn in_stock(&self) -> Vec<StockKey> {
        self.iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(k, _)| k.clone())
            .collect()
    }
}

/// One row of the stock dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub category: PartCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub key: String,
    pub quantity: u32,
}

impl StockLevel {
    fn new(key: &StockKey, quantity: u32) -> Self {
        Self {
            category: key.category(),
            partition: key.partition(),
            condition: key.condition(),
            key: key.key(),
            quantity,
        }
    }
}

/// Stock entries as seen while holding the store lock.
#[derive(Debug, Default)]
pub struct StockLedger {
    entries: BTreeMap<StockKey, u32>,
}

impl StockLedger {
    fn add(&mut self, key: &StockKey, qty: i64) -> DomainResult<u32> {
        if qty <= 0 {
            return Err(DomainError::InvalidQuantity(qty));
        }
        ensure_stockable(key)?;

        let current = self.quantity_of(key);
        let total = u32::try_from(qty)
            .ok()
            .and_then(|q| current.checked_add(q))
            .ok_or(DomainError::InvalidQuantity(qty))?;

        self.entries.insert(key.clone(), total);
        Ok(total)
    }

    /// Take one unit of every key, or nothing at all.
    ///
    /// Quantities are re-checked here; a key listed twice needs two units.
    pub fn decrement_all(&mut self, keys: &[StockKey]) -> DomainResult<()> {
        let mut required: BTreeMap<&StockKey, u32> = BTreeMap::new();
        for key in keys {
            *required.entry(key).or_insert(0) += 1;
        }

        let short: Vec<String> = required
            .iter()
            .filter(|(key, needed)| self.quantity_of(key) < **needed)
            .map(|(key, _)| format!("Out of stock: {}", key.describe()))
            .collect();
        if !short.is_empty() {
            return Err(DomainError::OutOfStock(short));
        }

        for (key, needed) in required {
            if let Some(qty) = self.entries.get_mut(key) {
                *qty -= needed;
            }
        }
        Ok(())
    }

    pub fn levels(&self) -> Vec<StockLevel> {
        self.entries
            .iter()
            .map(|(key, qty)| StockLevel::new(key, *qty))
            .collect()
    }
}

impl StockLevels for StockLedger {
    fn quantity_of(&self, key: &StockKey) -> u32 {
        self.entries.quantity_of(key)
    }

    fn in_stock(&self) -> Vec<StockKey> {
        self.entries.in_stock()
    }
}

/// Stock-add guard for keys no operator should be able to record.
fn ensure_stockable(key: &StockKey) -> DomainResult<()> {
    if let StockKey::Backplate { condition, label } = key {
        if let Some(size) = label.size() {
            if let Some(forced) = catalog::forced_thickness(*condition, size) {
                if label.thickness() != Some(forced) {
                    return Err(DomainError::validation(format!(
                        "{condition} {size} backplates are only stocked as {forced}"
                    )));
                }
            }
        }
    }
    Ok(())
}

/// In-memory inventory.
///
/// Every operation takes the single ledger lock, so a check followed by a
/// commit inside [`InventoryStore::transaction`] cannot interleave with
/// another writer.
#[derive(Debug, Default)]
pub struct InventoryStore {
    ledger: Mutex<StockLedger>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StockLedger> {
        // Ledger writes never leave a half-applied state, so a poisoned lock is still consistent.
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Increment a stock entry; returns the new quantity.
    pub fn add(&self, key: &StockKey, qty: i64) -> DomainResult<u32> {
        let total = self.lock().add(key, qty)?;
        tracing::debug!(
            category = %key.category(),
            partition = key.partition().unwrap_or("-"),
            key = %key.key(),
            added = qty,
            total,
            "stock added"
        );
        Ok(total)
    }

    /// Take one unit of every key atomically (see [`StockLedger::decrement_all`]).
    pub fn decrement_all(&self, keys: &[StockKey]) -> DomainResult<()> {
        self.lock().decrement_all(keys)
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut StockLedger) -> T) -> T {
        let mut ledger = self.lock();
        f(&mut ledger)
    }

    /// Full dump of every entry ever recorded, including zero quantities.
    pub fn snapshot(&self) -> Vec<StockLevel> {
        self.lock().levels()
    }
}

impl StockLevels for InventoryStore {
    fn quantity_of(&self, key: &StockKey) -> u32 {
        self.lock().quantity_of(key)
    }

    fn in_stock(&self) -> Vec<StockKey> {
        self.lock().in_stock()
    }
}
