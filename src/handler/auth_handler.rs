use crate::config::logging::secure_log;
use crate::dto::auth_dto::ProviderCallbackDto;
use crate::dto::token_dto::TokenPairDto;
use crate::error::request_error::{ValidatedQuery, ValidatedRequest};
use crate::error::AppError;
use crate::response::app_response::SuccessResponse;
use crate::state::auth_state::AuthState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tracing::info;

/// Provider callback, POST form: the verified assertion arrives as a JSON
/// body. This is the path browser-side SDKs and the fronting gateway use.
pub async fn provider_callback_post(
    State(state): State<AuthState>,
    Path(provider): Path<String>,
    ValidatedRequest(payload): ValidatedRequest<ProviderCallbackDto>,
) -> Result<impl IntoResponse, AppError> {
    login(state, provider, payload).await
}

/// Provider callback, GET form: redirect-style callbacks carry the assertion
/// in the query string.
pub async fn provider_callback_get(
    State(state): State<AuthState>,
    Path(provider): Path<String>,
    ValidatedQuery(payload): ValidatedQuery<ProviderCallbackDto>,
) -> Result<impl IntoResponse, AppError> {
    login(state, provider, payload).await
}

async fn login(
    state: AuthState,
    provider: String,
    payload: ProviderCallbackDto,
) -> Result<SuccessResponse<TokenPairDto>, AppError> {
    info!("Provider callback received for provider: {}", provider);

    let profile = state.provider_verifier.verify(&provider, &payload).await?;
    secure_log::sensitive_debug!("Verified assertion for email: {}", profile.email);

    let pair = state.auth_service.login_with_provider(profile).await?;
    info!("Login successful for user ID: {}", pair.user.id);

    Ok(SuccessResponse::send(pair))
}
