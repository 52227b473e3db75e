use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider assertion could not be accepted. The inner detail is for
    /// logs only and never reaches the response body.
    #[error("Identity provider rejected the sign-in")]
    ProviderRejected(String),
    #[error("Account already exists with a different sign-in method")]
    IdentityConflict,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status_code = match self {
            // Distinct from token failures: attributable to the provider
            // handshake, not to a presented token.
            AuthError::ProviderRejected(_) => StatusCode::UNAUTHORIZED,
            AuthError::IdentityConflict => StatusCode::CONFLICT,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
