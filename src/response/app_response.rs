use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

fn respond<T: Serialize>(status_code: StatusCode, payload: T) -> Response {
    (status_code, Json(payload)).into_response()
}

/// Envelope for every successful JSON response.
///
/// `status_code` never reaches the wire; it only drives the HTTP status
/// line. Deserializing a captured body yields the serde default (200).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip)]
    pub status_code: StatusCode,
}

impl<T> SuccessResponse<T> {
    pub fn send(data: T) -> Self {
        Self {
            success: true,
            data,
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for SuccessResponse<T> {
    fn into_response(self) -> Response {
        respond(self.status_code, self)
    }
}

/// Envelope for every error JSON response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationErrorDetail>>,
    #[serde(skip)]
    pub status_code: StatusCode,
}

impl ErrorResponse {
    /// Plain error body; defaults to 400, chain `with_status` to override.
    pub fn send(message: String) -> Self {
        Self {
            success: false,
            message,
            errors: None,
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    /// Validation failure carrying per-field details.
    pub fn with_validation_errors(message: String, errors: Vec<ValidationErrorDetail>) -> Self {
        Self {
            success: false,
            message,
            errors: Some(errors),
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        respond(self.status_code, self)
    }
}

/// One field-level entry under `errors` in a validation failure body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub r#type: String,
    pub details: String,
}

impl ValidationErrorDetail {
    pub fn new(field: String, r#type: String, details: String) -> Self {
        Self { field, r#type, details }
    }
}
