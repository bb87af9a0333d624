//! Compatibility rules.
//!
//! Every rule is evaluated and every violation is reported; none of them look
//! at stock levels.

use core::fmt;

use serde::Serialize;

use podforge_inventory::catalog;
use podforge_inventory::{BatteryCapacity, Condition, StockKey, StorageKind, Thickness};

use crate::request::BuildRequest;

/// A reason a build attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// A selected key has no stock.
    OutOfStock { key: StockKey },
    /// A used backplate of a forced-thick size is not thick.
    ForcedThickness {
        condition: Condition,
        size: String,
        required: Thickness,
        selected: Option<Thickness>,
    },
    /// The battery cannot be paired with this storage kind.
    BatteryStorageKind {
        capacity: BatteryCapacity,
        storage: StorageKind,
    },
    /// The battery does not fit inside the backplate's thickness.
    BatteryThickness {
        capacity: BatteryCapacity,
        thickness: Thickness,
    },
    /// The backplate's engraved size differs from the storage size.
    SizeMismatch {
        backplate_size: String,
        storage_size: String,
    },
}

impl Violation {
    pub fn is_availability(&self) -> bool {
        matches!(self, Violation::OutOfStock { .. })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OutOfStock { key } => write!(f, "Out of stock: {}", key.describe()),
            Violation::ForcedThickness {
                size, required, ..
            } => write!(f, "Used {size}GB backplate must be {required}."),
            Violation::BatteryStorageKind { capacity, storage } => write!(
                f,
                "{capacity} mAh battery only with SSD or iFlash, not {}.",
                storage.display_name()
            ),
            Violation::BatteryThickness {
                capacity,
                thickness,
            } => write!(f, "{capacity} mAh battery does not fit a {thickness} backplate."),
            Violation::SizeMismatch {
                backplate_size,
                storage_size,
            } => write!(
                f,
                "Backplate size {backplate_size} does not match storage size {storage_size}."
            ),
        }
    }
}

/// Batteries that fit behind a backplate of the given thickness.
pub fn batteries_for(thickness: Thickness) -> &'static [BatteryCapacity] {
    match thickness {
        Thickness::Thick => &[
            BatteryCapacity::Mah650,
            BatteryCapacity::Mah850,
            BatteryCapacity::Mah2000,
        ],
        Thickness::Thin => &[BatteryCapacity::Mah650, BatteryCapacity::Mah2000],
    }
}

/// Used 60 plates must be thick, whatever is in stock.
fn forced_thickness(req: &BuildRequest) -> Option<Violation> {
    let label = &req.backplate.label;
    let size = label.size()?;
    let required = catalog::forced_thickness(req.backplate.condition, size)?;
    if label.thickness() == Some(required) {
        return None;
    }
    Some(Violation::ForcedThickness {
        condition: req.backplate.condition,
        size: size.to_string(),
        required,
        selected: label.thickness(),
    })
}

/// 2000 mAh cells only fit next to solid-state or flash storage.
fn battery_storage_kind(req: &BuildRequest) -> Option<Violation> {
    if req.battery == BatteryCapacity::Mah2000 && req.storage.kind == StorageKind::HardDisk {
        Some(Violation::BatteryStorageKind {
            capacity: req.battery,
            storage: req.storage.kind,
        })
    } else {
        None
    }
}

/// Plates without a thickness (U2) do not restrict the battery.
fn battery_thickness(req: &BuildRequest) -> Option<Violation> {
    let thickness = req.backplate.label.thickness()?;
    if batteries_for(thickness).contains(&req.battery) {
        return None;
    }
    Some(Violation::BatteryThickness {
        capacity: req.battery,
        thickness,
    })
}

fn size_match(req: &BuildRequest) -> Option<Violation> {
    let label = &req.backplate.label;
    let backplate_size = label.size()?;
    if label.fits_storage_size(&req.storage.size) {
        return None;
    }
    Some(Violation::SizeMismatch {
        backplate_size: backplate_size.to_string(),
        storage_size: req.storage.size.clone(),
    })
}

/// Evaluate every compatibility rule, in a stable order.
pub fn check_compatibility(req: &BuildRequest) -> Vec<Violation> {
    [
        forced_thickness(req),
        battery_storage_kind(req),
        battery_thickness(req),
        size_match(req),
    ]
    .into_iter()
    .flatten()
    .collect()
}
