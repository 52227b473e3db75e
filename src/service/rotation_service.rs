use crate::config::database::Database;
use crate::config::logging::secure_log;
use crate::config::parameter;
use crate::dto::auth_dto::UserReadDto;
use crate::dto::token_dto::TokenPairDto;
use crate::entity::user::User;
use crate::error::{token_error::TokenError, AppError};
use crate::repository::refresh_token_repository::{
    RefreshTokenRepository, RefreshTokenRepositoryTrait, RotateOutcome,
};
use crate::repository::user_repository::{UserRepository, UserRepositoryTrait};
use crate::service::token_service::{TokenService, TokenServiceTrait};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Generate a cryptographically secure 32-byte random token, base64-encoded.
/// This raw form goes to the client and is never persisted.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);

    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// SHA-256 digest of the raw token, hex-encoded. This is the only form that
/// touches storage, and doubles as the lookup key.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();

    use std::fmt::Write;
    let mut hex_string = String::with_capacity(64);
    for byte in result {
        write!(hex_string, "{:02x}", byte).unwrap();
    }
    hex_string
}

#[derive(Clone)]
pub struct RotationConfig {
    pub refresh_token_ttl_days: i64,
    pub purge_retention_days: i64,
}

impl RotationConfig {
    pub fn from_env() -> Self {
        Self {
            refresh_token_ttl_days: parameter::get_i64("REFRESH_TOKEN_TTL_DAYS"),
            purge_retention_days: parameter::get_i64("REFRESH_PURGE_RETENTION_DAYS"),
        }
    }
}

#[derive(Clone)]
pub struct RotationService {
    refresh_repo: RefreshTokenRepository,
    user_repo: UserRepository,
    token_service: TokenService,
    refresh_token_ttl_days: i64,
    purge_retention_days: i64,
}

pub trait RotationServiceTrait {
    fn new(db_conn: &Arc<Database>, token_service: TokenService, config: RotationConfig) -> Self;
    fn calculate_expiration(&self) -> DateTime<Utc>;
    async fn issue(&self, user: &User) -> Result<TokenPairDto, AppError>;
    async fn exchange(&self, presented_raw: &str) -> Result<TokenPairDto, AppError>;
    async fn revoke(&self, user_id: &str) -> Result<u64, AppError>;
    async fn revoke_by_token(&self, presented_raw: &str) -> Result<(), AppError>;
    async fn purge_expired(&self) -> Result<u64, AppError>;
}

impl RotationServiceTrait for RotationService {
    fn new(db_conn: &Arc<Database>, token_service: TokenService, config: RotationConfig) -> Self {
        Self {
            refresh_repo: RefreshTokenRepository::new(db_conn),
            user_repo: UserRepository::new(db_conn),
            token_service,
            refresh_token_ttl_days: config.refresh_token_ttl_days,
            purge_retention_days: config.purge_retention_days,
        }
    }

    fn calculate_expiration(&self) -> DateTime<Utc> {
        Utc::now() + Duration::days(self.refresh_token_ttl_days)
    }

    /// Start a session for the user: mint an access token and persist a fresh
    /// refresh token. Any previous session row for this user is superseded
    /// atomically by the upsert.
    async fn issue(&self, user: &User) -> Result<TokenPairDto, AppError> {
        let raw_token = generate_refresh_token();
        let expire_at = self.calculate_expiration();

        self.refresh_repo
            .upsert(&user.id, &hash_refresh_token(&raw_token), expire_at)
            .await?;

        let access = self.token_service.issue(user)?;
        info!("Refresh token issued for user ID: {}", user.id);

        Ok(TokenPairDto {
            access_token: access.token,
            iat: access.iat,
            exp: access.exp,
            refresh_token: raw_token,
            refresh_expire_at: expire_at,
            user: UserReadDto::from(user.clone()),
        })
    }

    /// Trade a live refresh token for a new pair. Single-use: the presented
    /// token is consumed in the same transaction that persists its
    /// replacement, so a replayed or raced token comes back `RefreshNotFound`.
    async fn exchange(&self, presented_raw: &str) -> Result<TokenPairDto, AppError> {
        let presented_id = hash_refresh_token(presented_raw);
        let raw_token = generate_refresh_token();
        let expire_at = self.calculate_expiration();

        let outcome = self
            .refresh_repo
            .rotate(&presented_id, &hash_refresh_token(&raw_token), expire_at, Utc::now())
            .await?;

        let user_id = match outcome {
            RotateOutcome::Rotated { user_id } => user_id,
            RotateOutcome::NotFound => {
                secure_log::secure_error!("Refresh exchange rejected: token not recognized");
                return Err(TokenError::RefreshNotFound)?;
            }
            RotateOutcome::Expired => {
                secure_log::secure_error!("Refresh exchange rejected: token expired");
                return Err(TokenError::RefreshExpired)?;
            }
        };

        let user = self.user_repo.find(&user_id).await?;
        let access = self.token_service.issue(&user)?;
        info!("Refresh token rotated for user ID: {}", user_id);

        Ok(TokenPairDto {
            access_token: access.token,
            iat: access.iat,
            exp: access.exp,
            refresh_token: raw_token,
            refresh_expire_at: expire_at,
            user: UserReadDto::from(user),
        })
    }

    /// Tear down the user's session unconditionally.
    async fn revoke(&self, user_id: &str) -> Result<u64, AppError> {
        let removed = self.refresh_repo.delete_by_user(user_id).await?;
        info!("Revoked {} refresh token(s) for user ID: {}", removed, user_id);
        Ok(removed)
    }

    /// Logout entry point: resolve the presented token to its session row and
    /// delete it. Unknown tokens are rejected the same way exchange rejects
    /// them.
    async fn revoke_by_token(&self, presented_raw: &str) -> Result<(), AppError> {
        let presented_id = hash_refresh_token(presented_raw);

        match self.refresh_repo.delete_by_token_id(&presented_id).await? {
            Some(user_id) => {
                info!("Session revoked for user ID: {}", user_id);
                Ok(())
            }
            None => {
                secure_log::secure_error!("Logout rejected: refresh token not recognized");
                Err(TokenError::RefreshNotFound)?
            }
        }
    }

    /// Delete rows whose expiry is older than the retention window. Recently
    /// expired rows stay behind so a rejected exchange remains explainable.
    async fn purge_expired(&self) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::days(self.purge_retention_days);
        Ok(self.refresh_repo.purge_expired(cutoff).await?)
    }
}

/// Background purge task with graceful shutdown
pub fn start_purge_task(
    service: RotationService,
    interval_minutes: u64,
    shutdown_token: CancellationToken,
) -> JoinHandle<()> {
    let interval_duration = std::time::Duration::from_secs(interval_minutes * 60);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval_duration);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match service.purge_expired().await {
                        Ok(purged) => {
                            if purged > 0 {
                                tracing::info!("Purge pass removed {} expired refresh tokens", purged);
                            }
                        }
                        Err(e) => {
                            tracing::error!("Error during refresh token purge: {}", e);
                        }
                    }
                }
                _ = shutdown_token.cancelled() => {
                    tracing::info!("Refresh token purge task received shutdown signal, stopping gracefully");
                    break;
                }
            }
        }

        tracing::info!("Refresh token purge task stopped");
    })
}
