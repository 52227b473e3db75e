use crate::dto::auth_dto::UserReadDto;
use crate::entity::user::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Claims embedded in every access token. Everything a protected request
/// needs is here, so verification never touches storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenClaimsDto {
    pub sub: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TokenReadDto {
    pub token: String,
    pub iat: i64,
    pub exp: i64,
}

/// Full session payload returned by login and refresh: a fresh access token,
/// the raw (single-use) refresh token, and a snapshot of the user.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPairDto {
    pub access_token: String,
    pub iat: i64,
    pub exp: i64,
    pub refresh_token: String,
    pub refresh_expire_at: DateTime<Utc>,
    pub user: UserReadDto,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequestDto {
    #[validate(length(
        min = 1,
        message = "Refresh token is required"
    ))]
    pub refresh_token: String,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequestDto {
    #[validate(length(
        min = 1,
        message = "Refresh token is required"
    ))]
    pub refresh_token: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LogoutResponseDto {
    pub message: String,
}
