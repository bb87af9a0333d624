use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use podforge_core::{BuildId, DomainError, DomainResult};
use podforge_inventory::{Generation, InventoryStore, StockKey, StockLevels};

use crate::request::BuildRequest;
use crate::rules::{Violation, check_compatibility};

/// Which part of the error taxonomy a rejection falls under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    OutOfStock,
    IncompatibleSelection,
}

/// Proof of a committed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReceipt {
    pub build_id: BuildId,
    pub committed_at: DateTime<Utc>,
    pub generation: Generation,
    pub consumed: Vec<StockKey>,
}

/// Terminal state of a build attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Nothing was deducted.
    Rejected {
        kind: RejectionKind,
        violations: Vec<Violation>,
    },
    /// Exactly one unit of every selected key was deducted.
    Committed(BuildReceipt),
}

impl BuildOutcome {
    fn rejected(violations: Vec<Violation>) -> Self {
        let kind = if violations.iter().any(Violation::is_availability) {
            RejectionKind::OutOfStock
        } else {
            RejectionKind::IncompatibleSelection
        };
        BuildOutcome::Rejected { kind, violations }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, BuildOutcome::Committed(_))
    }

    /// Human-readable rejection reasons, in evaluation order (empty on commit).
    pub fn reasons(&self) -> Vec<String> {
        match self {
            BuildOutcome::Rejected { violations, .. } => {
                violations.iter().map(ToString::to_string).collect()
            }
            BuildOutcome::Committed(_) => Vec::new(),
        }
    }

    pub fn into_result(self) -> DomainResult<BuildReceipt> {
        let reasons = self.reasons();
        match self {
            BuildOutcome::Committed(receipt) => Ok(receipt),
            BuildOutcome::Rejected {
                kind: RejectionKind::OutOfStock,
                ..
            } => Err(DomainError::OutOfStock(reasons)),
            BuildOutcome::Rejected {
                kind: RejectionKind::IncompatibleSelection,
                ..
            } => Err(DomainError::IncompatibleSelection(reasons)),
        }
    }
}

/// Availability step: one violation per selected key with no stock.
pub fn check_availability<L: StockLevels + ?Sized>(req: &BuildRequest, levels: &L) -> Vec<Violation> {
    req.selected_keys()
        .into_iter()
        .filter(|key| levels.quantity_of(key) == 0)
        .map(|key| Violation::OutOfStock { key })
        .collect()
}

/// Pure evaluation of a request against stock levels: availability first, then rules.
pub fn evaluate<L: StockLevels + ?Sized>(req: &BuildRequest, levels: &L) -> Vec<Violation> {
    let mut violations = check_availability(req, levels);
    violations.extend(check_compatibility(req));
    violations
}

/// Validate and, if clean, commit a build under the store lock.
///
/// The check and the decrement share one critical section, so two attempts
/// racing for the last unit of a key cannot both succeed.
pub fn attempt_build(store: &InventoryStore, req: &BuildRequest) -> BuildOutcome {
    let keys = req.selected_keys();

    let outcome = store.transaction(|ledger| {
        let violations = evaluate(req, &*ledger);
        if !violations.is_empty() {
            return BuildOutcome::rejected(violations);
        }
        match ledger.decrement_all(&keys) {
            Ok(()) => BuildOutcome::Committed(BuildReceipt {
                build_id: BuildId::new(),
                committed_at: Utc::now(),
                generation: req.generation,
                consumed: keys.clone(),
            }),
            Err(_) => BuildOutcome::rejected(check_availability(req, &*ledger)),
        }
    });

    match &outcome {
        BuildOutcome::Committed(receipt) => tracing::info!(
            build_id = %receipt.build_id,
            generation = %receipt.generation,
            parts = receipt.consumed.len(),
            "build committed"
        ),
        BuildOutcome::Rejected { kind, violations } => tracing::info!(
            kind = ?kind,
            reasons = violations.len(),
            "build rejected"
        ),
    }
    outcome
}

/// Build validator bound to an inventory.
#[derive(Debug, Clone)]
pub struct BuildValidator {
    store: Arc<InventoryStore>,
}

impl BuildValidator {
    pub fn new(store: Arc<InventoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<InventoryStore> {
        &self.store
    }

    /// Dry run: report what an attempt would reject right now, without committing.
    pub fn check(&self, req: &BuildRequest) -> Vec<Violation> {
        self.store.transaction(|ledger| evaluate(req, &*ledger))
    }

    pub fn attempt(&self, req: &BuildRequest) -> BuildOutcome {
        attempt_build(&self.store, req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::BuildSelection;
    use crate::request::tests::valid_selection;
    use podforge_inventory::StockLevel;
    use proptest::prelude::*;

    fn stocked_store(req: &BuildRequest, qty: i64) -> InventoryStore {
        let store = InventoryStore::new();
        for key in req.selected_keys() {
            store.add(&key, qty).unwrap();
        }
        store
    }

    fn request(edit: impl FnOnce(&mut BuildSelection)) -> BuildRequest {
        let mut sel = valid_selection();
        edit(&mut sel);
        BuildRequest::parse(&sel).unwrap()
    }

    #[test]
    fn faceplate_scenario_commits_and_decrements() {
        let req = request(|_| {});
        let store = stocked_store(&req, 1);
        let black = StockKey::resolve("faceplate", Some("5"), Some("new"), "black").unwrap();
        store.add(&black, 1).unwrap();
        assert_eq!(store.quantity_of(&black), 2);

        let outcome = attempt_build(&store, &req);

        assert!(outcome.is_committed());
        assert_eq!(store.quantity_of(&black), 1);
    }

    #[test]
    fn commit_decrements_exactly_the_selected_keys() {
        let req = request(|_| {});
        let store = stocked_store(&req, 3);
        let bystander = StockKey::resolve("faceplate", Some("6"), Some("new"), "black").unwrap();
        store.add(&bystander, 3).unwrap();

        let receipt = attempt_build(&store, &req).into_result().unwrap();

        assert_eq!(receipt.consumed, req.selected_keys());
        assert_eq!(receipt.generation, Generation::Five);
        for key in req.selected_keys() {
            assert_eq!(store.quantity_of(&key), 2);
        }
        assert_eq!(store.quantity_of(&bystander), 3);
    }

    #[test]
    fn missing_stock_is_reported_and_nothing_is_deducted() {
        let req = request(|_| {});
        let store = InventoryStore::new();
        let battery = StockKey::resolve("battery", None, None, "850").unwrap();
        for key in req.selected_keys().into_iter().filter(|k| *k != battery) {
            store.add(&key, 1).unwrap();
        }
        let before = store.snapshot();

        let outcome = attempt_build(&store, &req);

        assert_eq!(outcome.reasons(), vec!["Out of stock: battery – 850".to_string()]);
        assert!(matches!(outcome, BuildOutcome::Rejected { kind: RejectionKind::OutOfStock, .. }));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn faceplate_from_another_family_or_condition_does_not_count() {
        let req = request(|_| {});
        let wanted = StockKey::resolve("faceplate", Some("5"), Some("new"), "black").unwrap();
        let store = InventoryStore::new();
        for key in req.selected_keys().into_iter().filter(|k| *k != wanted) {
            store.add(&key, 1).unwrap();
        }
        let late = StockKey::resolve("faceplate", Some("6"), Some("new"), "black").unwrap();
        let used = StockKey::resolve("faceplate", Some("5.5"), Some("used"), "black").unwrap();
        store.add(&late, 2).unwrap();
        store.add(&used, 2).unwrap();
        let before = store.snapshot();

        let outcome = attempt_build(&store, &req);

        assert_eq!(outcome.reasons(), vec!["Out of stock: faceplate – black".to_string()]);
        assert!(matches!(outcome, BuildOutcome::Rejected { kind: RejectionKind::OutOfStock, .. }));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn large_battery_with_hard_disk_is_rejected_without_mutation() {
        let req = request(|s| s.battery = "2000".into());
        let store = stocked_store(&req, 1);
        let before = store.snapshot();

        let err = attempt_build(&store, &req).into_result().unwrap_err();

        match err {
            DomainError::IncompatibleSelection(reasons) => {
                assert_eq!(
                    reasons,
                    vec!["2000 mAh battery only with SSD or iFlash, not Hard Disk.".to_string()]
                );
            }
            _ => panic!("Expected IncompatibleSelection"),
        }
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn used_sixty_thin_is_rejected_even_when_stock_exists() {
        let req = request(|s| {
            s.backplate.condition = "used".into();
            s.backplate.key = "60_thin".into();
            s.storage.size = "60".into();
            s.battery = "650".into();
        });
        // The store refuses used 60 thin plates, so there is no stock to find either.
        let store = InventoryStore::new();
        for key in req.selected_keys() {
            let _ = store.add(&key, 5);
        }

        let outcome = attempt_build(&store, &req);
        let reasons = outcome.reasons();
        assert!(reasons.contains(&"Used 60GB backplate must be thick.".to_string()));
        assert!(reasons.contains(&"Out of stock: backplate – 60_thin".to_string()));
        assert!(matches!(outcome, BuildOutcome::Rejected { kind: RejectionKind::OutOfStock, .. }));
    }

    #[test]
    fn thin_backplate_with_850_is_rejected_thick_accepted() {
        let thin = request(|s| s.backplate.key = "80_thin".into());
        let store = stocked_store(&thin, 1);
        assert!(!attempt_build(&store, &thin).is_committed());

        let thick = request(|s| s.backplate.key = "80_thick".into());
        let store = stocked_store(&thick, 1);
        assert!(attempt_build(&store, &thick).is_committed());
    }

    #[test]
    fn availability_and_compatibility_reasons_are_reported_together() {
        let req = request(|s| s.battery = "2000".into());
        let store = InventoryStore::new();

        let outcome = attempt_build(&store, &req);
        let reasons = outcome.reasons();

        assert_eq!(reasons.len(), 7);
        assert!(reasons[..6].iter().all(|r| r.starts_with("Out of stock: ")));
        assert_eq!(reasons[6], "2000 mAh battery only with SSD or iFlash, not Hard Disk.");
    }

    #[test]
    fn validator_check_is_a_dry_run() {
        let req = request(|_| {});
        let validator = BuildValidator::new(Arc::new(stocked_store(&req, 1)));

        assert!(validator.check(&req).is_empty());
        assert!(validator.check(&req).is_empty());
        assert!(validator.attempt(&req).is_committed());
        assert_eq!(validator.check(&req).len(), 6);
    }

    #[test]
    fn racing_builds_for_the_last_unit_commit_exactly_once() {
        let req = request(|_| {});
        let validator = BuildValidator::new(Arc::new(stocked_store(&req, 1)));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let validator = validator.clone();
                let req = req.clone();
                std::thread::spawn(move || validator.attempt(&req))
            })
            .collect();
        let outcomes: Vec<BuildOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(outcomes.iter().filter(|o| o.is_committed()).count(), 1);
        let loser = outcomes.iter().find(|o| !o.is_committed()).unwrap();
        assert!(matches!(loser, BuildOutcome::Rejected { kind: RejectionKind::OutOfStock, .. }));
        assert!(
            validator
                .store()
                .snapshot()
                .iter()
                .all(|StockLevel { quantity, .. }| *quantity == 0)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: a commit takes exactly one unit per selected key; a rejection takes none.
        #[test]
        fn attempt_is_all_or_nothing(
            quantities in prop::collection::vec(0i64..3i64, 6),
            battery in prop::sample::select(vec!["650", "850", "2000"]),
            thickness in prop::sample::select(vec!["thin", "thick"]),
        ) {
            let req = request(|s| {
                s.battery = battery.to_string();
                s.backplate.key = format!("80_{thickness}");
            });
            let store = InventoryStore::new();
            for (key, qty) in req.selected_keys().iter().zip(&quantities) {
                if *qty > 0 {
                    store.add(key, *qty).unwrap();
                }
            }
            let before: Vec<u32> = req.selected_keys().iter().map(|k| store.quantity_of(k)).collect();

            let outcome = attempt_build(&store, &req);
            let after: Vec<u32> = req.selected_keys().iter().map(|k| store.quantity_of(k)).collect();

            if outcome.is_committed() {
                for (b, a) in before.iter().zip(&after) {
                    prop_assert_eq!(*a + 1, *b);
                }
            } else {
                prop_assert_eq!(before, after);
            }
        }
    }
}
