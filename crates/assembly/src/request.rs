use core::str::FromStr;

use serde::{Deserialize, Serialize};

use podforge_core::{DomainError, DomainResult};
use podforge_inventory::catalog;
use podforge_inventory::{
    BackplateLabel, BatteryCapacity, ColoredPartKind, Condition, Generation, StockKey, StorageKind,
};

// -------------------------
// Raw selection (as collected by a presentation layer)
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChoice {
    pub condition: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackplateChoice {
    pub condition: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageChoice {
    pub kind: String,
    pub size: String,
}

/// One chosen key per category, as primitive strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSelection {
    pub generation: String,
    pub faceplate: ColorChoice,
    pub clickwheel: ColorChoice,
    pub central_button: ColorChoice,
    pub backplate: BackplateChoice,
    pub storage: StorageChoice,
    pub battery: String,
}

// -------------------------
// Typed request
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredSelection {
    pub condition: Condition,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackplateSelection {
    pub condition: Condition,
    pub label: BackplateLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSelection {
    pub kind: StorageKind,
    pub size: String,
}

/// A single build attempt. Transient: built per attempt, dropped after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub generation: Generation,
    pub faceplate: ColoredSelection,
    pub clickwheel: ColoredSelection,
    pub central_button: ColoredSelection,
    pub backplate: BackplateSelection,
    pub storage: StorageSelection,
    pub battery: BatteryCapacity,
}

impl BuildRequest {
    /// Parse a raw selection, reporting every malformed field at once.
    pub fn parse(selection: &BuildSelection) -> DomainResult<Self> {
        let mut errors = Vec::new();

        let generation = field::<Generation>(&mut errors, "generation", &selection.generation);
        let faceplate = colored(&mut errors, "faceplate", &selection.faceplate);
        let clickwheel = colored(&mut errors, "clickwheel", &selection.clickwheel);
        let central_button = colored(&mut errors, "central_button", &selection.central_button);

        let backplate = match (
            field::<Condition>(&mut errors, "backplate.condition", &selection.backplate.condition),
            field::<BackplateLabel>(&mut errors, "backplate.key", &selection.backplate.key),
        ) {
            (Some(condition), Some(label)) => Some(BackplateSelection { condition, label }),
            _ => None,
        };

        let storage = field::<StorageKind>(&mut errors, "storage.kind", &selection.storage.kind)
            .and_then(|kind| match catalog::canonical_storage_size(kind, &selection.storage.size) {
                Some(size) => Some(StorageSelection {
                    kind,
                    size: size.to_string(),
                }),
                None => {
                    errors.push(format!(
                        "storage.size: '{}' is not offered for {} storage",
                        selection.storage.size.trim(),
                        kind
                    ));
                    None
                }
            });

        let battery = field::<BatteryCapacity>(&mut errors, "battery", &selection.battery);

        match (generation, faceplate, clickwheel, central_button, backplate, storage, battery) {
            (
                Some(generation),
                Some(faceplate),
                Some(clickwheel),
                Some(central_button),
                Some(backplate),
                Some(storage),
                Some(battery),
            ) if errors.is_empty() => Ok(BuildRequest {
                generation,
                faceplate,
                clickwheel,
                central_button,
                backplate,
                storage,
                battery,
            }),
            _ => Err(DomainError::validation(errors.join("; "))),
        }
    }

    /// One stock key per category, in category order.
    pub fn selected_keys(&self) -> Vec<StockKey> {
        let family = self.generation.family();
        let front = |kind: ColoredPartKind, sel: &ColoredSelection| StockKey::Colored {
            kind,
            family,
            condition: sel.condition,
            color: sel.color.clone(),
        };

        vec![
            StockKey::backplate(self.backplate.condition, self.backplate.label.clone()),
            front(ColoredPartKind::Faceplate, &self.faceplate),
            front(ColoredPartKind::Clickwheel, &self.clickwheel),
            front(ColoredPartKind::CentralButton, &self.central_button),
            StockKey::Storage {
                kind: self.storage.kind,
                size: self.storage.size.clone(),
            },
            StockKey::battery(self.battery),
        ]
    }
}

fn field<T>(errors: &mut Vec<String>, name: &str, value: &str) -> Option<T>
where
    T: FromStr<Err = DomainError>,
{
    match value.parse::<T>() {
        Ok(v) => Some(v),
        Err(DomainError::Validation(msg)) => {
            errors.push(format!("{name}: {msg}"));
            None
        }
        Err(other) => {
            errors.push(format!("{name}: {other}"));
            None
        }
    }
}

fn colored(errors: &mut Vec<String>, name: &str, choice: &ColorChoice) -> Option<ColoredSelection> {
    let condition = field::<Condition>(errors, &format!("{name}.condition"), &choice.condition);
    let color = choice.color.trim().to_lowercase();
    if color.is_empty() {
        errors.push(format!("{name}.color: color cannot be empty"));
        return None;
    }
    condition.map(|condition| ColoredSelection { condition, color })
}
