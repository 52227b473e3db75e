use crate::dto::token_dto::TokenClaimsDto;
use crate::entity::user::{AuthProvider, User, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile assertion arriving at the provider callback. By the time it
/// reaches this service the upstream handshake has already happened; the
/// payload is the provider's verified view of the user.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct ProviderCallbackDto {
    #[validate(email(message = "Email format is invalid"))]
    #[validate(length(
        max = 254,
        message = "Email must not exceed 254 characters"
    ))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "First name must be between 1 and 100 characters"
    ))]
    pub firstname: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Last name must be between 1 and 100 characters"
    ))]
    pub lastname: String,
}

impl std::fmt::Debug for ProviderCallbackDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCallback")
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserReadDto {
    pub id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
    pub auth_type: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserReadDto {
    pub fn from(model: User) -> UserReadDto {
        Self {
            id: model.id,
            email: model.email,
            firstname: model.firstname,
            lastname: model.lastname,
            role: model.role,
            auth_type: model.auth_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Profile answered straight from verified claims; no storage round trip.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProfileReadDto {
    pub id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
}

impl ProfileReadDto {
    pub fn from(claims: TokenClaimsDto) -> ProfileReadDto {
        Self {
            id: claims.sub,
            email: claims.email,
            firstname: claims.firstname,
            lastname: claims.lastname,
            role: claims.role,
        }
    }
}
