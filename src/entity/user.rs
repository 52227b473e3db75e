use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization tier carried in access-token claims. The core only
/// transports it; policy evaluation happens elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Regular,
    Admin,
    Manager,
}

/// Identity provider an account is bound to. An email can only ever be
/// associated with one provider; see the identity-conflict rule in the
/// auth service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AuthProvider {
    Microsoft,
    Google,
    Linkedin,
    #[default]
    Email,
}

impl AuthProvider {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_ascii_lowercase().as_str() {
            "microsoft" => Some(Self::Microsoft),
            "google" => Some(Self::Google),
            "linkedin" => Some(Self::Linkedin),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
    pub auth_type: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_slug_parsing() {
        assert_eq!(AuthProvider::from_slug("google"), Some(AuthProvider::Google));
        assert_eq!(AuthProvider::from_slug("Microsoft"), Some(AuthProvider::Microsoft));
        assert_eq!(AuthProvider::from_slug("LINKEDIN"), Some(AuthProvider::Linkedin));
        assert_eq!(AuthProvider::from_slug("github"), None);
        assert_eq!(AuthProvider::from_slug(""), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(UserRole::default(), UserRole::Regular);
        assert_eq!(AuthProvider::default(), AuthProvider::Email);
    }
}
