use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use podforge_assembly::{BuildOutcome, BuildReceipt, BuildRequest, BuildValidator, Violation};
use podforge_core::DomainResult;
use podforge_inventory::{InventoryStore, StockKey};

/// Everything the handlers share: one inventory, its validator, and the build log.
#[derive(Debug)]
pub struct AppServices {
    store: Arc<InventoryStore>,
    validator: BuildValidator,
    builds: Mutex<Vec<BuildReceipt>>,
}

impl AppServices {
    pub fn new(store: Arc<InventoryStore>) -> Self {
        Self {
            validator: BuildValidator::new(store.clone()),
            store,
            builds: Mutex::new(Vec::new()),
        }
    }

    /// Empty in-memory inventory (state lives as long as the process).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InventoryStore::new()))
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn add_stock(&self, key: &StockKey, quantity: i64) -> DomainResult<u32> {
        self.store.add(key, quantity)
    }

    pub fn check_build(&self, req: &BuildRequest) -> Vec<Violation> {
        self.validator.check(req)
    }

    /// Attempt a build; committed receipts are appended to the build log.
    ///
    /// The log lock is held across the commit, so log order is commit order.
    /// Lock order is always log, then ledger.
    pub fn attempt_build(&self, req: &BuildRequest) -> BuildOutcome {
        let mut builds = self.builds_lock();
        let outcome = self.validator.attempt(req);
        if let BuildOutcome::Committed(receipt) = &outcome {
            builds.push(receipt.clone());
        }
        outcome
    }

    /// Committed builds, oldest first.
    pub fn builds(&self) -> Vec<BuildReceipt> {
        self.builds_lock().clone()
    }

    fn builds_lock(&self) -> MutexGuard<'_, Vec<BuildReceipt>> {
        self.builds.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
