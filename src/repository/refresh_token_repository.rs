use crate::config::database::{Database, DatabaseTrait};
use crate::config::logging::secure_log;
use crate::entity::refresh_token::RefreshToken;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use std::sync::Arc;
use tracing::info;

/// Issue-or-replace, keyed on the user_id unique constraint. A user's new
/// session always supersedes the old one in a single statement.
const UPSERT_SQL: &str = "INSERT INTO refresh_tokens (token_id, user_id, expire_at, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?) \
     ON CONFLICT(user_id) DO UPDATE SET \
         token_id = excluded.token_id, \
         expire_at = excluded.expire_at, \
         updated_at = excluded.updated_at";

/// Result of a rotation attempt. `Expired` means the row was found but past
/// its expiry; it stays in the store for audit.
#[derive(Debug, PartialEq, Eq)]
pub enum RotateOutcome {
    Rotated { user_id: String },
    NotFound,
    Expired,
}

#[derive(Clone)]
pub struct RefreshTokenRepository {
    pub(crate) db_conn: Arc<Database>,
}

#[async_trait]
pub trait RefreshTokenRepositoryTrait {
    fn new(db_conn: &Arc<Database>) -> Self;
    async fn upsert(&self, user_id: &str, token_id: &str, expire_at: DateTime<Utc>) -> Result<(), Error>;
    async fn find_by_token_id(&self, token_id: &str) -> Result<Option<RefreshToken>, Error>;
    async fn rotate(
        &self,
        presented_token_id: &str,
        next_token_id: &str,
        next_expire_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RotateOutcome, Error>;
    async fn delete_by_user(&self, user_id: &str) -> Result<u64, Error>;
    async fn delete_by_token_id(&self, token_id: &str) -> Result<Option<String>, Error>;
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, Error>;
}

#[async_trait]
impl RefreshTokenRepositoryTrait for RefreshTokenRepository {
    fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }

    async fn upsert(&self, user_id: &str, token_id: &str, expire_at: DateTime<Utc>) -> Result<(), Error> {
        let now = Utc::now();
        match sqlx::query(UPSERT_SQL)
            .bind(token_id)
            .bind(user_id)
            .bind(expire_at)
            .bind(now)
            .bind(now)
            .execute(self.db_conn.get_pool())
            .await
        {
            Ok(_) => {
                secure_log::sensitive_debug!("Refresh token stored for user ID: {}", user_id);
                Ok(())
            }
            Err(e) => {
                secure_log::secure_error!("Failed to store refresh token", e);
                Err(e)
            }
        }
    }

    async fn find_by_token_id(&self, token_id: &str) -> Result<Option<RefreshToken>, Error> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT token_id, user_id, expire_at, created_at, updated_at FROM refresh_tokens WHERE token_id = ?"
        )
        .bind(token_id)
        .fetch_optional(self.db_conn.get_pool())
        .await
    }

    /// Single-use exchange. The conditional DELETE both claims the presented
    /// token and decides the race: under concurrent exchanges exactly one
    /// caller deletes the row, every other caller sees `NotFound`. The
    /// replacement upsert rides in the same transaction, so an abandoned
    /// request can never leave the user without a live session row.
    async fn rotate(
        &self,
        presented_token_id: &str,
        next_token_id: &str,
        next_expire_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RotateOutcome, Error> {
        let mut tx = self.db_conn.get_pool().begin().await?;

        let claimed: Option<String> = sqlx::query_scalar(
            "DELETE FROM refresh_tokens WHERE token_id = ? AND expire_at > ? RETURNING user_id",
        )
        .bind(presented_token_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = claimed else {
            // Nothing was claimed: either the token is stale (row exists but
            // expired; it is retained for audit) or it is gone entirely.
            let stale: Option<String> =
                sqlx::query_scalar("SELECT user_id FROM refresh_tokens WHERE token_id = ?")
                    .bind(presented_token_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Ok(match stale {
                Some(_) => RotateOutcome::Expired,
                None => RotateOutcome::NotFound,
            });
        };

        sqlx::query(UPSERT_SQL)
            .bind(next_token_id)
            .bind(&user_id)
            .bind(next_expire_at)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RotateOutcome::Rotated { user_id })
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(self.db_conn.get_pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_token_id(&self, token_id: &str) -> Result<Option<String>, Error> {
        sqlx::query_scalar("DELETE FROM refresh_tokens WHERE token_id = ? RETURNING user_id")
            .bind(token_id)
            .fetch_optional(self.db_conn.get_pool())
            .await
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expire_at < ?")
            .bind(cutoff)
            .execute(self.db_conn.get_pool())
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!("Purged {} expired refresh token rows", purged);
        }
        Ok(purged)
    }
}
