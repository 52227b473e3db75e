use crate::config::logging::secure_log;
use crate::dto::auth_dto::ProfileReadDto;
use crate::dto::token_dto::TokenClaimsDto;
use crate::response::app_response::SuccessResponse;
use axum::Extension;

/// Served entirely from the verified claims the gate injected; no storage
/// round trip.
pub async fn profile(
    Extension(claims): Extension<TokenClaimsDto>,
) -> SuccessResponse<ProfileReadDto> {
    secure_log::sensitive_debug!("Profile accessed for email: {}", claims.email);

    SuccessResponse::send(ProfileReadDto::from(claims))
}
