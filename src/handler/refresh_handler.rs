use crate::config::logging::secure_log;
use crate::dto::token_dto::{LogoutRequestDto, LogoutResponseDto, RefreshTokenRequestDto, TokenPairDto};
use crate::error::{request_error::ValidatedRequest, AppError};
use crate::response::app_response::SuccessResponse;
use crate::service::rotation_service::RotationServiceTrait;
use crate::state::auth_state::AuthState;
use axum::extract::State;

/// Exchange a refresh token for a fresh access/refresh pair. The presented
/// token is consumed; replaying it afterwards is indistinguishable from
/// presenting garbage.
pub async fn refresh_token(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<RefreshTokenRequestDto>,
) -> Result<SuccessResponse<TokenPairDto>, AppError> {
    secure_log::sensitive_debug!("Token refresh attempt");

    let pair = state.rotation_service.exchange(&payload.refresh_token).await?;

    secure_log::sensitive_debug!("Token refresh successful for user ID: {}", pair.user.id);
    Ok(SuccessResponse::send(pair))
}

/// Logout by invalidating the presented refresh token.
pub async fn logout(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<LogoutRequestDto>,
) -> Result<SuccessResponse<LogoutResponseDto>, AppError> {
    secure_log::sensitive_debug!("Logout attempt");

    state.rotation_service.revoke_by_token(&payload.refresh_token).await?;

    Ok(SuccessResponse::send(LogoutResponseDto {
        message: "Logged out successfully".to_string(),
    }))
}
