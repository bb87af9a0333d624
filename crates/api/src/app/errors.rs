use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use podforge_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidQuantity(q) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_quantity",
            format!("quantity must be a positive integer (got {q})"),
        ),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::OutOfStock(reasons) => json_reasons(StatusCode::CONFLICT, "out_of_stock", reasons),
        DomainError::IncompatibleSelection(reasons) => json_reasons(
            StatusCode::UNPROCESSABLE_ENTITY,
            "incompatible_selection",
            reasons,
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_reasons(
    status: StatusCode,
    code: &'static str,
    reasons: Vec<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": "build not possible",
            "reasons": reasons,
        })),
    )
        .into_response()
}
