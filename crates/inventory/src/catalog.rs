//! Part vocabularies and in-stock option queries.
//!
//! These are the filters a presentation layer uses to offer only valid,
//! currently stocked choices. The build validator never relies on them.

use serde::Serialize;

use crate::part::{
    BackplateLabel, BatteryCapacity, ColoredPartKind, Condition, Generation, GenerationFamily,
    StockKey, StorageKind, Thickness,
};
use crate::store::StockLevels;

const EARLY_COLORS: &[&str] = &["black", "white", "blue", "yellow", "red", "transparent"];
const LATE_COLORS: &[&str] = &["silver", "black", "space grey", "blue", "gold", "green", "red"];

const HARD_DISK_SIZES: &[&str] = &["30", "60", "80", "120", "160"];
const SSD_SIZES: &[&str] = &["128", "256", "512", "1TB", "2TB"];
const FLASH_MODULE_SIZES: &[&str] = &["64", "128", "256", "512", "1TB", "2TB"];

/// Backplate size whose used plates only come in the thick variant.
pub const FORCED_THICK_SIZE: &str = "60";

/// Colors offered for faceplates, clickwheels and central buttons of a family.
pub fn colors(family: GenerationFamily) -> &'static [&'static str] {
    match family {
        GenerationFamily::Early => EARLY_COLORS,
        GenerationFamily::Late => LATE_COLORS,
    }
}

pub fn storage_sizes(kind: StorageKind) -> &'static [&'static str] {
    match kind {
        StorageKind::HardDisk => HARD_DISK_SIZES,
        StorageKind::Ssd => SSD_SIZES,
        StorageKind::FlashModule => FLASH_MODULE_SIZES,
    }
}

/// Case-insensitive lookup of a size label in the kind's vocabulary.
pub fn canonical_storage_size(kind: StorageKind, size: &str) -> Option<&'static str> {
    let size = size.trim();
    storage_sizes(kind)
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(size))
}

/// The only thickness a backplate of this condition and size may have, if restricted.
pub fn forced_thickness(condition: Condition, size: &str) -> Option<Thickness> {
    if condition == Condition::Used && size.trim() == FORCED_THICK_SIZE {
        Some(Thickness::Thick)
    } else {
        None
    }
}

/// Thickness choices to offer when adding a backplate to stock.
pub fn thickness_choices(condition: Condition, size: &str) -> Vec<Thickness> {
    match forced_thickness(condition, size) {
        Some(t) => vec![t],
        None => vec![Thickness::Thin, Thickness::Thick],
    }
}

/// In-stock colors for a front part, in stock-key order.
pub fn available_colors<L: StockLevels + ?Sized>(
    levels: &L,
    kind: ColoredPartKind,
    family: GenerationFamily,
    condition: Condition,
) -> Vec<String> {
    levels
        .in_stock()
        .into_iter()
        .filter_map(|key| match key {
            StockKey::Colored {
                kind: k,
                family: f,
                condition: c,
                color,
            } if k == kind && f == family && c == condition => Some(color),
            _ => None,
        })
        .collect()
}

/// In-stock backplates that may be paired with storage of `storage_size`.
///
/// Only plates whose size equals the storage size, or the U2 plate, qualify.
pub fn candidate_backplates<L: StockLevels + ?Sized>(
    levels: &L,
    condition: Condition,
    storage_size: &str,
) -> Vec<BackplateLabel> {
    levels
        .in_stock()
        .into_iter()
        .filter_map(|key| match key {
            StockKey::Backplate { condition: c, label }
                if c == condition && label.fits_storage_size(storage_size) =>
            {
                Some(label)
            }
            _ => None,
        })
        .collect()
}

/// In-stock storage sizes for a kind.
pub fn available_storage<L: StockLevels + ?Sized>(levels: &L, kind: StorageKind) -> Vec<String> {
    levels
        .in_stock()
        .into_iter()
        .filter_map(|key| match key {
            StockKey::Storage { kind: k, size } if k == kind => Some(size),
            _ => None,
        })
        .collect()
}

pub fn available_batteries<L: StockLevels + ?Sized>(levels: &L) -> Vec<BatteryCapacity> {
    levels
        .in_stock()
        .into_iter()
        .filter_map(|key| match key {
            StockKey::Battery { capacity } => Some(capacity),
            _ => None,
        })
        .collect()
}

/// Full vocabulary listing for rendering selection widgets.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub generations: Vec<&'static str>,
    pub conditions: Vec<&'static str>,
    pub colors: Vec<FamilyColors>,
    pub storage: Vec<StorageSizes>,
    pub batteries: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyColors {
    pub family: GenerationFamily,
    pub generations: Vec<&'static str>,
    pub colors: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageSizes {
    pub kind: StorageKind,
    pub display_name: &'static str,
    pub sizes: &'static [&'static str],
}

pub fn catalog() -> Catalog {
    let family_colors = [GenerationFamily::Early, GenerationFamily::Late]
        .into_iter()
        .map(|family| FamilyColors {
            family,
            generations: Generation::ALL
                .iter()
                .filter(|g| g.family() == family)
                .map(|g| g.as_str())
                .collect(),
            colors: colors(family),
        })
        .collect();

    let storage = StorageKind::ALL
        .into_iter()
        .map(|kind| StorageSizes {
            kind,
            display_name: kind.display_name(),
            sizes: storage_sizes(kind),
        })
        .collect();

    Catalog {
        generations: Generation::ALL.iter().map(|g| g.as_str()).collect(),
        conditions: Condition::ALL.iter().map(|c| c.as_str()).collect(),
        colors: family_colors,
        storage,
        batteries: BatteryCapacity::ALL.iter().map(|b| b.as_str()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn levels(entries: &[(StockKey, u32)]) -> BTreeMap<StockKey, u32> {
        entries.iter().cloned().collect()
    }

    fn backplate(condition: Condition, label: &str) -> StockKey {
        StockKey::backplate(condition, label.parse().unwrap())
    }

    #[test]
    fn used_sixty_backplate_only_offers_thick() {
        assert_eq!(thickness_choices(Condition::Used, "60"), vec![Thickness::Thick]);
        assert_eq!(
            thickness_choices(Condition::New, "60"),
            vec![Thickness::Thin, Thickness::Thick]
        );
        assert_eq!(
            thickness_choices(Condition::Used, "80"),
            vec![Thickness::Thin, Thickness::Thick]
        );
    }

    #[test]
    fn available_colors_skips_zero_quantity_and_other_partitions() {
        let black = StockKey::colored(ColoredPartKind::Faceplate, Generation::Five, Condition::New, "black").unwrap();
        let white = StockKey::colored(ColoredPartKind::Faceplate, Generation::Five, Condition::New, "white").unwrap();
        let used = StockKey::colored(ColoredPartKind::Faceplate, Generation::Five, Condition::Used, "red").unwrap();
        let late = StockKey::colored(ColoredPartKind::Faceplate, Generation::Six, Condition::New, "gold").unwrap();
        let wheel = StockKey::colored(ColoredPartKind::Clickwheel, Generation::Five, Condition::New, "blue").unwrap();
        let lv = levels(&[(black, 2), (white, 0), (used, 1), (late, 1), (wheel, 1)]);

        let colors = available_colors(&lv, ColoredPartKind::Faceplate, GenerationFamily::Early, Condition::New);
        assert_eq!(colors, vec!["black".to_string()]);
    }

    #[test]
    fn candidate_backplates_match_storage_size_or_u2() {
        let lv = levels(&[
            (backplate(Condition::New, "80_thin"), 1),
            (backplate(Condition::New, "160_thick"), 1),
            (backplate(Condition::New, "U2"), 1),
            (backplate(Condition::Used, "80_thick"), 1),
            (backplate(Condition::New, "80_thick"), 0),
        ]);

        let candidates = candidate_backplates(&lv, Condition::New, "80");
        assert_eq!(
            candidates,
            vec![
                BackplateLabel::sized("80", Some(Thickness::Thin)),
                BackplateLabel::U2,
            ]
        );
    }

    #[test]
    fn catalog_lists_family_generations() {
        let c = catalog();
        assert_eq!(c.generations, vec!["5", "5.5", "6", "7"]);
        assert_eq!(c.colors[0].generations, vec!["5", "5.5"]);
        assert_eq!(c.colors[1].generations, vec!["6", "7"]);
        assert!(c.colors[1].colors.contains(&"space grey"));
    }

    #[test]
    fn canonical_storage_size_is_case_insensitive() {
        assert_eq!(canonical_storage_size(StorageKind::FlashModule, "2tb"), Some("2TB"));
        assert_eq!(canonical_storage_size(StorageKind::HardDisk, "64"), None);
    }
}
