use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use podforge_assembly::{BuildReceipt, Violation};
use podforge_inventory::StockKey;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddStockRequest {
    pub category: String,
    pub generation: Option<String>,
    pub condition: Option<String>,
    pub key: String,
    pub quantity: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    /// Suppress zero-quantity entries.
    #[serde(default)]
    pub in_stock: bool,
}

#[derive(Debug, Deserialize)]
pub struct ColorOptionsQuery {
    pub part: String,
    pub generation: String,
    pub condition: String,
}

#[derive(Debug, Deserialize)]
pub struct BackplateOptionsQuery {
    pub condition: String,
    pub storage_size: String,
}

#[derive(Debug, Deserialize)]
pub struct ThicknessOptionsQuery {
    pub condition: String,
    pub size: String,
}

#[derive(Debug, Deserialize)]
pub struct StorageOptionsQuery {
    pub kind: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn stock_key_to_json(key: &StockKey) -> serde_json::Value {
    serde_json::json!({
        "category": key.category(),
        "partition": key.partition(),
        "condition": key.condition(),
        "key": key.key(),
    })
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2026-10-16T09:30:00.000Z`.
pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn receipt_to_json(receipt: &BuildReceipt) -> serde_json::Value {
    serde_json::json!({
        "build_id": receipt.build_id.to_string(),
        "committed_at": timestamp(&receipt.committed_at),
        "generation": receipt.generation,
        "consumed": receipt.consumed.iter().map(stock_key_to_json).collect::<Vec<_>>(),
    })
}

pub fn violation_to_json(violation: &Violation) -> serde_json::Value {
    serde_json::json!({
        "message": violation.to_string(),
        "detail": violation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use podforge_core::BuildId;
    use podforge_inventory::{BatteryCapacity, Generation};

    #[test]
    fn receipt_json_uses_utc_millisecond_timestamps() {
        let receipt = BuildReceipt {
            build_id: BuildId::new(),
            committed_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            generation: Generation::Five,
            consumed: vec![StockKey::battery(BatteryCapacity::Mah850)],
        };

        let json = receipt_to_json(&receipt);

        assert_eq!(json["committed_at"], "2026-10-16T09:30:00.000Z");
        assert_eq!(json["build_id"], receipt.build_id.to_string());
        assert_eq!(json["consumed"][0]["category"], "battery");
        assert_eq!(json["consumed"][0]["key"], "850");
    }
}
