use crate::config::logging::secure_log;
use crate::error::{token_error::TokenError, AppError};
use crate::service::token_service::TokenServiceTrait;
use crate::state::token_state::TokenState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::IntoResponse;
use tracing::info;

/// Bearer gate for protected routes. Verification is stateless: the signature
/// and expiry say everything, no session lookup happens here. Every failure
/// answers with the same generic 401; the specific reason goes to the log.
pub async fn auth(
    State(state): State<TokenState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = caller_ip(&req);

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            secure_log::secure_error!("Bearer token absent from IP: {}", client_ip);
            TokenError::MissingCredential
        })?;

    if bearer.is_empty() {
        secure_log::secure_error!("Blank bearer token from IP: {}", client_ip);
        return Err(TokenError::MissingCredential)?;
    }

    match state.token_service.verify(bearer) {
        Ok(claims) => {
            info!(
                "SECURITY: Access granted for user ID: {} from IP: {}",
                claims.sub, client_ip
            );
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(err) => {
            // The rejection kind is operational signal, not client data.
            tracing::warn!("Access token rejected ({}) from IP: {}", err, client_ip);
            Err(err)?
        }
    }
}

fn caller_ip(req: &Request<Body>) -> String {
    req.headers()
        .get("x-forwarded-for")
        .or_else(|| req.headers().get("x-real-ip"))
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
