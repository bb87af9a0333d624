//! Vocabulary and in-stock option lists for selection widgets.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use podforge_core::DomainResult;
use podforge_inventory::{ColoredPartKind, Condition, Generation, StorageKind, catalog};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn get_catalog() -> axum::response::Response {
    (StatusCode::OK, Json(catalog::catalog())).into_response()
}

pub async fn color_options(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ColorOptionsQuery>,
) -> axum::response::Response {
    let (kind, generation, condition) = match parse_color_query(&query) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let family = generation.family();
    let colors = catalog::available_colors(services.store(), kind, family, condition);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "part": kind,
            "family": family,
            "condition": condition,
            "colors": colors,
        })),
    )
        .into_response()
}

fn parse_color_query(
    query: &dto::ColorOptionsQuery,
) -> DomainResult<(ColoredPartKind, Generation, Condition)> {
    Ok((
        query.part.parse()?,
        query.generation.parse()?,
        query.condition.parse()?,
    ))
}

pub async fn backplate_options(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::BackplateOptionsQuery>,
) -> axum::response::Response {
    let condition: Condition = match query.condition.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let labels: Vec<String> =
        catalog::candidate_backplates(services.store(), condition, &query.storage_size)
            .into_iter()
            .map(|l| l.to_string())
            .collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "condition": condition,
            "storage_size": query.storage_size.trim(),
            "backplates": labels,
        })),
    )
        .into_response()
}

pub async fn thickness_options(Query(query): Query<dto::ThicknessOptionsQuery>) -> axum::response::Response {
    let condition: Condition = match query.condition.parse() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "condition": condition,
            "size": query.size.trim(),
            "thickness": catalog::thickness_choices(condition, &query.size),
        })),
    )
        .into_response()
}

pub async fn storage_options(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::StorageOptionsQuery>,
) -> axum::response::Response {
    let kind: StorageKind = match query.kind.parse() {
        Ok(k) => k,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "kind": kind,
            "sizes": catalog::available_storage(services.store(), kind),
        })),
    )
        .into_response()
}

pub async fn battery_options(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "batteries": catalog::available_batteries(services.store()),
        })),
    )
        .into_response()
}
