use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use podforge_core::{DomainError, DomainResult, ValueObject};

use crate::catalog;

/// Device generation a colored part is fitted to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Generation {
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "5.5")]
    FivePointFive,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
}

impl Generation {
    pub const ALL: [Generation; 4] = [
        Generation::Five,
        Generation::FivePointFive,
        Generation::Six,
        Generation::Seven,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Generation::Five => "5",
            Generation::FivePointFive => "5.5",
            Generation::Six => "6",
            Generation::Seven => "7",
        }
    }

    /// Faceplates, clickwheels and central buttons are interchangeable within a family.
    pub fn family(self) -> GenerationFamily {
        match self {
            Generation::Five | Generation::FivePointFive => GenerationFamily::Early,
            Generation::Six | Generation::Seven => GenerationFamily::Late,
        }
    }
}

impl FromStr for Generation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5" => Ok(Generation::Five),
            "5.5" => Ok(Generation::FivePointFive),
            "6" => Ok(Generation::Six),
            "7" => Ok(Generation::Seven),
            other => Err(DomainError::validation(format!(
                "unknown generation '{other}' (expected one of 5, 5.5, 6, 7)"
            ))),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a generation label and map it to its family.
pub fn generation_family(generation: &str) -> DomainResult<GenerationFamily> {
    Ok(generation.parse::<Generation>()?.family())
}

/// Stock partition shared by generations with compatible front parts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationFamily {
    /// Generations 5 and 5.5.
    Early,
    /// Generations 6 and 7.
    Late,
}

impl GenerationFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationFamily::Early => "early",
            GenerationFamily::Late => "late",
        }
    }
}

impl fmt::Display for GenerationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::New, Condition::Used];

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
        }
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Condition::New),
            "used" => Ok(Condition::Used),
            _ => Err(DomainError::validation(format!(
                "unknown condition '{}' (expected new or used)",
                s.trim()
            ))),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Front parts keyed by color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColoredPartKind {
    Faceplate,
    Clickwheel,
    CentralButton,
}

impl ColoredPartKind {
    pub const ALL: [ColoredPartKind; 3] = [
        ColoredPartKind::Faceplate,
        ColoredPartKind::Clickwheel,
        ColoredPartKind::CentralButton,
    ];

    pub fn category(self) -> PartCategory {
        match self {
            ColoredPartKind::Faceplate => PartCategory::Faceplate,
            ColoredPartKind::Clickwheel => PartCategory::Clickwheel,
            ColoredPartKind::CentralButton => PartCategory::CentralButton,
        }
    }
}

impl FromStr for ColoredPartKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "faceplate" => Ok(ColoredPartKind::Faceplate),
            "clickwheel" => Ok(ColoredPartKind::Clickwheel),
            "central-button" => Ok(ColoredPartKind::CentralButton),
            other => Err(DomainError::validation(format!(
                "unknown colored part '{other}' (expected faceplate, clickwheel or central-button)"
            ))),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Thickness {
    Thin,
    Thick,
}

impl Thickness {
    pub fn as_str(self) -> &'static str {
        match self {
            Thickness::Thin => "thin",
            Thickness::Thick => "thick",
        }
    }
}

impl FromStr for Thickness {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thin" => Ok(Thickness::Thin),
            "thick" => Ok(Thickness::Thick),
            other => Err(DomainError::validation(format!(
                "unknown thickness '{other}' (expected thin or thick)"
            ))),
        }
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backplate stock label: `{size}[_{thickness}]`, or the special `U2` edition plate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackplateLabel {
    Sized {
        size: String,
        thickness: Option<Thickness>,
    },
    U2,
}

impl BackplateLabel {
    pub const U2_LABEL: &'static str = "U2";

    pub fn sized(size: impl Into<String>, thickness: Option<Thickness>) -> Self {
        BackplateLabel::Sized {
            size: size.into(),
            thickness,
        }
    }

    /// Engraved capacity; `None` for the U2 plate.
    pub fn size(&self) -> Option<&str> {
        match self {
            BackplateLabel::Sized { size, .. } => Some(size),
            BackplateLabel::U2 => None,
        }
    }

    pub fn thickness(&self) -> Option<Thickness> {
        match self {
            BackplateLabel::Sized { thickness, .. } => *thickness,
            BackplateLabel::U2 => None,
        }
    }

    /// True when this plate may be paired with storage of the given size.
    pub fn fits_storage_size(&self, storage_size: &str) -> bool {
        match self {
            BackplateLabel::U2 => true,
            BackplateLabel::Sized { size, .. } => size.eq_ignore_ascii_case(storage_size.trim()),
        }
    }
}

impl FromStr for BackplateLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::U2_LABEL) {
            return Ok(BackplateLabel::U2);
        }

        let (size, thickness) = match s.split_once('_') {
            Some((size, thickness)) => (size, Some(thickness.parse::<Thickness>()?)),
            None => (s, None),
        };

        if size.is_empty() || size.chars().any(char::is_whitespace) {
            return Err(DomainError::validation(format!(
                "invalid backplate label '{s}' (expected SIZE, SIZE_thin, SIZE_thick or U2)"
            )));
        }
        if size.eq_ignore_ascii_case(Self::U2_LABEL) {
            return Err(DomainError::validation("U2 backplates have no thickness"));
        }

        // Same spelling as the storage vocabulary, so `1tb` and `1TB` are one key.
        let size = StorageKind::ALL
            .iter()
            .find_map(|kind| catalog::canonical_storage_size(*kind, size))
            .unwrap_or(size);

        Ok(BackplateLabel::sized(size, thickness))
    }
}

impl fmt::Display for BackplateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackplateLabel::U2 => f.write_str(Self::U2_LABEL),
            BackplateLabel::Sized {
                size,
                thickness: None,
            } => f.write_str(size),
            BackplateLabel::Sized {
                size,
                thickness: Some(t),
            } => write!(f, "{size}_{t}"),
        }
    }
}

impl TryFrom<String> for BackplateLabel {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackplateLabel> for String {
    fn from(value: BackplateLabel) -> Self {
        value.to_string()
    }
}

/// Storage sub-kind; decides the allowed size vocabulary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    HardDisk,
    Ssd,
    FlashModule,
}

impl StorageKind {
    pub const ALL: [StorageKind; 3] = [StorageKind::HardDisk, StorageKind::Ssd, StorageKind::FlashModule];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::HardDisk => "hard-disk",
            StorageKind::Ssd => "ssd",
            StorageKind::FlashModule => "flash-module",
        }
    }

    /// Name shown to operators.
    pub fn display_name(self) -> &'static str {
        match self {
            StorageKind::HardDisk => "Hard Disk",
            StorageKind::Ssd => "SSD",
            StorageKind::FlashModule => "iFlash",
        }
    }
}

impl FromStr for StorageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard-disk" | "hdd" => Ok(StorageKind::HardDisk),
            "ssd" | "solid-state" => Ok(StorageKind::Ssd),
            "flash-module" | "iflash" => Ok(StorageKind::FlashModule),
            other => Err(DomainError::validation(format!(
                "unknown storage kind '{other}' (expected hard-disk, ssd or flash-module)"
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BatteryCapacity {
    #[serde(rename = "650")]
    Mah650,
    #[serde(rename = "850")]
    Mah850,
    #[serde(rename = "2000")]
    Mah2000,
}

impl BatteryCapacity {
    pub const ALL: [BatteryCapacity; 3] = [
        BatteryCapacity::Mah650,
        BatteryCapacity::Mah850,
        BatteryCapacity::Mah2000,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BatteryCapacity::Mah650 => "650",
            BatteryCapacity::Mah850 => "850",
            BatteryCapacity::Mah2000 => "2000",
        }
    }
}

impl FromStr for BatteryCapacity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "650" => Ok(BatteryCapacity::Mah650),
            "850" => Ok(BatteryCapacity::Mah850),
            "2000" => Ok(BatteryCapacity::Mah2000),
            other => Err(DomainError::validation(format!(
                "unknown battery capacity '{other}' (expected 650, 850 or 2000)"
            ))),
        }
    }
}

impl fmt::Display for BatteryCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level part category, as shown to operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartCategory {
    Backplate,
    Faceplate,
    Clickwheel,
    CentralButton,
    Storage,
    Battery,
}

impl PartCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PartCategory::Backplate => "backplate",
            PartCategory::Faceplate => "faceplate",
            PartCategory::Clickwheel => "clickwheel",
            PartCategory::CentralButton => "central-button",
            PartCategory::Storage => "storage",
            PartCategory::Battery => "battery",
        }
    }
}

impl fmt::Display for PartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one stock entry.
///
/// Variant and field order define the dump order: category, then partition,
/// then condition, then key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StockKey {
    Backplate {
        condition: Condition,
        label: BackplateLabel,
    },
    Colored {
        kind: ColoredPartKind,
        family: GenerationFamily,
        condition: Condition,
        color: String,
    },
    Storage {
        kind: StorageKind,
        size: String,
    },
    Battery {
        capacity: BatteryCapacity,
    },
}

impl ValueObject for StockKey {}

impl StockKey {
    pub fn colored(
        kind: ColoredPartKind,
        generation: Generation,
        condition: Condition,
        color: &str,
    ) -> DomainResult<Self> {
        let color = color.trim().to_lowercase();
        if color.is_empty() {
            return Err(DomainError::validation("color cannot be empty"));
        }
        Ok(StockKey::Colored {
            kind,
            family: generation.family(),
            condition,
            color,
        })
    }

    pub fn backplate(condition: Condition, label: BackplateLabel) -> Self {
        StockKey::Backplate { condition, label }
    }

    /// Storage keys are canonicalised against the kind's size vocabulary.
    pub fn storage(kind: StorageKind, size: &str) -> DomainResult<Self> {
        let size = catalog::canonical_storage_size(kind, size).ok_or_else(|| {
            DomainError::validation(format!(
                "size '{}' is not offered for {} storage (expected one of {})",
                size.trim(),
                kind,
                catalog::storage_sizes(kind).join(", ")
            ))
        })?;
        Ok(StockKey::Storage {
            kind,
            size: size.to_string(),
        })
    }

    pub fn battery(capacity: BatteryCapacity) -> Self {
        StockKey::Battery { capacity }
    }

    /// Resolve a stock key from the primitive inputs a presentation layer collects.
    ///
    /// `category` is one of `backplate`, `faceplate`, `clickwheel`,
    /// `central-button`, `hard-disk`, `ssd`, `flash-module`, `battery`.
    /// Generation and condition are required only where the category is
    /// partitioned by them; otherwise they are ignored.
    pub fn resolve(
        category: &str,
        generation: Option<&str>,
        condition: Option<&str>,
        key: &str,
    ) -> DomainResult<Self> {
        let category = category.trim().to_ascii_lowercase();
        match category.as_str() {
            "faceplate" | "clickwheel" | "central-button" => {
                let kind: ColoredPartKind = category.parse()?;
                let generation: Generation = required(generation, "generation", &category)?.parse()?;
                let condition: Condition = required(condition, "condition", &category)?.parse()?;
                StockKey::colored(kind, generation, condition, key)
            }
            "backplate" => {
                let condition: Condition = required(condition, "condition", &category)?.parse()?;
                Ok(StockKey::backplate(condition, key.parse()?))
            }
            "battery" => Ok(StockKey::battery(key.parse()?)),
            other => match other.parse::<StorageKind>() {
                Ok(kind) => StockKey::storage(kind, key),
                Err(_) => Err(DomainError::validation(format!(
                    "unknown part category '{other}'"
                ))),
            },
        }
    }

    pub fn category(&self) -> PartCategory {
        match self {
            StockKey::Backplate { .. } => PartCategory::Backplate,
            StockKey::Colored { kind, .. } => kind.category(),
            StockKey::Storage { .. } => PartCategory::Storage,
            StockKey::Battery { .. } => PartCategory::Battery,
        }
    }

    /// Partition below the category, if any (generation family or storage kind).
    pub fn partition(&self) -> Option<&'static str> {
        match self {
            StockKey::Colored { family, .. } => Some(family.as_str()),
            StockKey::Storage { kind, .. } => Some(kind.as_str()),
            StockKey::Backplate { .. } | StockKey::Battery { .. } => None,
        }
    }

    pub fn condition(&self) -> Option<Condition> {
        match self {
            StockKey::Colored { condition, .. } | StockKey::Backplate { condition, .. } => Some(*condition),
            StockKey::Storage { .. } | StockKey::Battery { .. } => None,
        }
    }

    /// Category-specific key string (color, backplate label, size, capacity).
    pub fn key(&self) -> String {
        match self {
            StockKey::Backplate { label, .. } => label.to_string(),
            StockKey::Colored { color, .. } => color.clone(),
            StockKey::Storage { size, .. } => size.clone(),
            StockKey::Battery { capacity } => capacity.to_string(),
        }
    }

    /// `{category} – {key}`, the form used in operator messages.
    pub fn describe(&self) -> String {
        format!("{} – {}", self.category(), self.key())
    }
}

fn required<'a>(value: Option<&'a str>, field: &str, category: &str) -> DomainResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required for {category}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_family_maps_five_and_five_point_five_to_early() {
        assert_eq!(generation_family("5").unwrap(), GenerationFamily::Early);
        assert_eq!(generation_family("5.5").unwrap(), GenerationFamily::Early);
        assert_eq!(generation_family("6").unwrap(), GenerationFamily::Late);
        assert_eq!(generation_family("7").unwrap(), GenerationFamily::Late);
    }

    #[test]
    fn unknown_generation_is_rejected() {
        let err = generation_family("4").unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("unknown generation")),
            _ => panic!("Expected Validation error for unknown generation"),
        }
    }

    #[test]
    fn backplate_label_parses_size_and_thickness() {
        let label: BackplateLabel = "60_thick".parse().unwrap();
        assert_eq!(label.size(), Some("60"));
        assert_eq!(label.thickness(), Some(Thickness::Thick));
        assert_eq!(label.to_string(), "60_thick");

        let bare: BackplateLabel = "80".parse().unwrap();
        assert_eq!(bare.thickness(), None);
        assert_eq!(bare.to_string(), "80");
    }

    #[test]
    fn u2_backplate_has_no_size_or_thickness() {
        let label: BackplateLabel = "U2".parse().unwrap();
        assert_eq!(label, BackplateLabel::U2);
        assert_eq!(label.size(), None);
        assert_eq!(label.thickness(), None);
        assert!(label.fits_storage_size("160"));
        assert!("U2_thin".parse::<BackplateLabel>().is_err());
    }

    #[test]
    fn backplate_size_is_spelled_like_storage_sizes() {
        let lower = StockKey::resolve("backplate", None, Some("new"), "1tb_thick").unwrap();
        let upper = StockKey::resolve("backplate", None, Some("new"), "1TB_thick").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.key(), "1TB_thick");

        let odd: BackplateLabel = "7gb".parse().unwrap();
        assert_eq!(odd.size(), Some("7gb"));
    }

    #[test]
    fn backplate_label_rejects_unknown_thickness() {
        assert!("60_medium".parse::<BackplateLabel>().is_err());
        assert!("_thin".parse::<BackplateLabel>().is_err());
    }

    #[test]
    fn resolve_colored_part_uses_generation_family() {
        let a = StockKey::resolve("faceplate", Some("5"), Some("new"), "Black").unwrap();
        let b = StockKey::resolve("faceplate", Some("5.5"), Some("new"), "black").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.partition(), Some("early"));
        assert_eq!(a.condition(), Some(Condition::New));
        assert_eq!(a.describe(), "faceplate – black");
    }

    #[test]
    fn resolve_requires_condition_for_partitioned_categories() {
        assert!(StockKey::resolve("clickwheel", Some("6"), None, "silver").is_err());
        assert!(StockKey::resolve("backplate", None, None, "80_thin").is_err());
    }

    #[test]
    fn resolve_ignores_generation_for_backplates_and_batteries() {
        let a = StockKey::resolve("backplate", Some("5"), Some("used"), "80_thin").unwrap();
        let b = StockKey::resolve("backplate", Some("7"), Some("used"), "80_thin").unwrap();
        assert_eq!(a, b);

        let battery = StockKey::resolve("battery", Some("6"), Some("new"), "850").unwrap();
        assert_eq!(battery, StockKey::battery(BatteryCapacity::Mah850));
        assert_eq!(battery.condition(), None);
    }

    #[test]
    fn resolve_storage_checks_size_vocabulary() {
        let key = StockKey::resolve("ssd", None, None, "1tb").unwrap();
        assert_eq!(key.key(), "1TB");
        assert_eq!(key.partition(), Some("ssd"));
        assert!(StockKey::resolve("hard-disk", None, None, "1TB").is_err());
        assert!(StockKey::resolve("floppy", None, None, "1").is_err());
    }

    #[test]
    fn stock_keys_order_by_category_then_partition_then_condition() {
        let mut keys = vec![
            StockKey::battery(BatteryCapacity::Mah650),
            StockKey::resolve("faceplate", Some("6"), Some("used"), "red").unwrap(),
            StockKey::resolve("faceplate", Some("5"), Some("used"), "red").unwrap(),
            StockKey::resolve("faceplate", Some("5"), Some("new"), "red").unwrap(),
            StockKey::resolve("backplate", None, Some("new"), "U2").unwrap(),
        ];
        keys.sort();

        let summary: Vec<_> = keys
            .iter()
            .map(|k| (k.category(), k.partition(), k.condition()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (PartCategory::Backplate, None, Some(Condition::New)),
                (PartCategory::Faceplate, Some("early"), Some(Condition::New)),
                (PartCategory::Faceplate, Some("early"), Some(Condition::Used)),
                (PartCategory::Faceplate, Some("late"), Some(Condition::Used)),
                (PartCategory::Battery, None, None),
            ]
        );
    }
}
