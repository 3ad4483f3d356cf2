//! The JSON response envelope.
//!
//! Success responses carry `{status, message, data}`; failures carry
//! `{error}` with the HTTP status encoding the category. The insufficient-
//! balance conflict additionally carries a machine-readable code so the
//! platform can branch on it.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use farebox_shared::AppError;

/// Builds a success envelope.
pub fn success(status: StatusCode, message: &str, data: serde_json::Value) -> Response {
    (
        status,
        Json(json!({
            "status": "success",
            "message": message,
            "data": data,
        })),
    )
        .into_response()
}

/// Builds a failure envelope from an application error.
pub fn app_error(error: &AppError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = if matches!(error, AppError::InsufficientBalance) {
        json!({ "status": "error", "code": error.error_code() })
    } else {
        json!({ "error": error.to_string() })
    };

    (status, Json(body)).into_response()
}

/// Shorthand for a 400 validation failure.
pub fn validation(message: &str) -> Response {
    app_error(&AppError::Validation(message.to_string()))
}
