use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use podforge_assembly::{BuildOutcome, BuildRequest, BuildSelection, RejectionKind};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn attempt_build(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<BuildSelection>,
) -> axum::response::Response {
    let req = match BuildRequest::parse(&body) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.attempt_build(&req) {
        BuildOutcome::Committed(receipt) => {
            let mut json = dto::receipt_to_json(&receipt);
            json["status"] = "committed".into();
            (StatusCode::OK, Json(json)).into_response()
        }
        BuildOutcome::Rejected { kind, violations } => {
            let (status, code) = match kind {
                RejectionKind::OutOfStock => (StatusCode::CONFLICT, "out_of_stock"),
                RejectionKind::IncompatibleSelection => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "incompatible_selection")
                }
            };
            (
                status,
                Json(serde_json::json!({
                    "status": "rejected",
                    "error": code,
                    "message": "build not possible",
                    "reasons": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "violations": violations.iter().map(dto::violation_to_json).collect::<Vec<_>>(),
                })),
            )
                .into_response()
        }
    }
}

/// Dry run of `POST /build`: reports problems without touching stock.
pub async fn check_build(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<BuildSelection>,
) -> axum::response::Response {
    let req = match BuildRequest::parse(&body) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let violations = services.check_build(&req);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "buildable": violations.is_empty(),
            "reasons": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "violations": violations.iter().map(dto::violation_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

pub async fn list_builds(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let builds: Vec<_> = services.builds().iter().map(dto::receipt_to_json).collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": builds.len(),
            "builds": builds,
        })),
    )
        .into_response()
}
