use crate::config::database::Database;
use crate::config::logging::secure_log;
use crate::dto::token_dto::TokenPairDto;
use crate::entity::user::{User, UserRole};
use crate::error::auth_error::AuthError;
use crate::error::db_error::DbError;
use crate::error::AppError;
use crate::repository::user_repository::{UserRepository, UserRepositoryTrait};
use crate::service::provider::VerifiedProfile;
use crate::service::rotation_service::{RotationService, RotationServiceTrait};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    rotation_service: RotationService,
}

impl AuthService {
    pub fn new(db_conn: &Arc<Database>, rotation_service: RotationService) -> Self {
        Self {
            user_repo: UserRepository::new(db_conn),
            rotation_service,
        }
    }

    /// Sign in with a verified external identity. First login provisions the
    /// account; later logins resolve it by email. An email already owned by a
    /// different provider is a conflict, never a silent merge or takeover.
    pub async fn login_with_provider(
        &self,
        profile: VerifiedProfile,
    ) -> Result<TokenPairDto, AppError> {
        let user = match self.user_repo.find_by_email(&profile.email).await? {
            Some(existing) => self.check_provider(existing, &profile)?,
            None => self.create_from_profile(&profile).await?,
        };

        self.rotation_service.issue(&user).await
    }

    fn check_provider(&self, user: User, profile: &VerifiedProfile) -> Result<User, AppError> {
        if user.auth_type != profile.provider {
            secure_log::secure_error!(
                "SECURITY: Provider mismatch on login for user ID: {}", user.id
            );
            return Err(AuthError::IdentityConflict)?;
        }
        Ok(user)
    }

    async fn create_from_profile(&self, profile: &VerifiedProfile) -> Result<User, AppError> {
        let now = chrono::Utc::now();
        let user = User {
            id: uuid::Uuid::now_v7().to_string(),
            email: profile.email.clone(),
            firstname: profile.firstname.clone(),
            lastname: profile.lastname.clone(),
            role: UserRole::Regular,
            auth_type: profile.provider,
            created_at: now,
            updated_at: now,
        };

        match self.user_repo.create(&user).await {
            Ok(()) => {
                tracing::info!("Provisioned new user ID: {} on first login", user.id);
                Ok(user)
            }
            Err(e) => {
                // Two first logins for the same address can race past the
                // lookup; the unique index on email arbitrates. Defer to the
                // row that won the insert.
                if let Some(winner) = self.user_repo.find_by_email(&profile.email).await? {
                    return self.check_provider(winner, profile);
                }
                secure_log::secure_error!("Failed to create user", e);
                Err(DbError::SomethingWentWrong("User creation failed".to_string()))?
            }
        }
    }
}
