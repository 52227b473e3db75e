use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted refresh-token row. `token_id` is the SHA-256 hex digest of the
/// raw token handed to the client; the raw value itself is never stored.
/// At most one row exists per user (UNIQUE on user_id).
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub token_id: String,
    pub user_id: String,
    pub expire_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
