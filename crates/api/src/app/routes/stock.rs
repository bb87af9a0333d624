use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use podforge_inventory::StockKey;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn add_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AddStockRequest>,
) -> axum::response::Response {
    let key = match StockKey::resolve(
        &body.category,
        body.generation.as_deref(),
        body.condition.as_deref(),
        &body.key,
    ) {
        Ok(k) => k,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let total = match services.add_stock(&key, body.quantity) {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut json = dto::stock_key_to_json(&key);
    json["quantity"] = total.into();
    json["added"] = body.quantity.into();
    (StatusCode::CREATED, Json(json)).into_response()
}

pub async fn list_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::StockQuery>,
) -> axum::response::Response {
    let entries: Vec<_> = services
        .store()
        .snapshot()
        .into_iter()
        .filter(|level| !query.in_stock || level.quantity > 0)
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": entries.len(),
            "entries": entries,
        })),
    )
        .into_response()
}
