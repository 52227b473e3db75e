use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The one message every credential failure maps to on the wire. Splitting
/// expired vs tampered vs unknown externally would hand probes an oracle;
/// the precise kind is logged server-side instead.
pub const GENERIC_AUTH_MESSAGE: &str = "Unauthorized access";

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Missing Bearer token")]
    MissingCredential,
    #[error("Refresh token not recognized")]
    RefreshNotFound,
    #[error("Refresh token has expired")]
    RefreshExpired,
    #[error("Token error: {0}")]
    CreationFailed(String),
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            TokenError::CreationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            // All credential failures collapse into the same response body.
            TokenError::Malformed
            | TokenError::InvalidSignature
            | TokenError::Expired
            | TokenError::MissingCredential
            | TokenError::RefreshNotFound
            | TokenError::RefreshExpired => {
                (StatusCode::UNAUTHORIZED, GENERIC_AUTH_MESSAGE.to_string())
            }
        };

        ErrorResponse::send(message).with_status(status_code).into_response()
    }
}
