use crate::response::app_response::{ErrorResponse, ValidationErrorDetail};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),
    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),
    #[error(transparent)]
    QueryRejection(#[from] QueryRejection),
}

/// JSON extractor that rejects payloads failing their `validator` rules
/// before the handler runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedRequest<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedRequest<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(RequestError::JsonRejection)?;
        payload.validate()?;
        Ok(ValidatedRequest(payload))
    }
}

/// Query-string twin of [`ValidatedRequest`] for redirect-style callbacks;
/// rejections answer with the same JSON envelope as body failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(payload) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(RequestError::QueryRejection)?;
        payload.validate()?;
        Ok(ValidatedQuery(payload))
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let body = match self {
            RequestError::ValidationError(errors) => ErrorResponse::with_validation_errors(
                "Validation failed".to_string(),
                field_error_details(errors),
            ),
            RequestError::JsonRejection(_) | RequestError::QueryRejection(_) => {
                ErrorResponse::send(self.to_string())
            }
        };
        body.with_status(StatusCode::BAD_REQUEST).into_response()
    }
}

fn field_error_details(errors: validator::ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let semantic_type = match error.code.as_ref() {
                "email" => "INVALID_FORMAT",
                "length" => {
                    let min = error.params.get("min").and_then(|v| v.as_i64());
                    if min == Some(1) && !error.params.contains_key("max") {
                        "MISSING"
                    } else {
                        "INVALID_LENGTH"
                    }
                }
                _ => "INVALID_VALUE",
            };
            let message = error
                .message
                .clone()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid value".to_string());
            details.push(ValidationErrorDetail::new(
                field.to_string(),
                semantic_type.to_string(),
                message,
            ));
        }
    }
    details
}
