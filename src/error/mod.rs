pub mod auth_error;
pub mod db_error;
pub mod request_error;
pub mod token_error;

// Unified application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Token(#[from] token_error::TokenError),
    #[error(transparent)]
    Auth(#[from] auth_error::AuthError),
    #[error(transparent)]
    Db(#[from] db_error::DbError),
    #[error(transparent)]
    Request(#[from] request_error::RequestError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use crate::response::app_response::ErrorResponse;

        match self {
            AppError::Token(e) => e.into_response(),
            AppError::Auth(e) => e.into_response(),
            AppError::Db(e) => e.into_response(),
            AppError::Request(e) => e.into_response(),
            AppError::Database(_) => ErrorResponse::send("Database error".to_string())
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
        }
    }
}
