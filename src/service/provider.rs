use crate::dto::auth_dto::ProviderCallbackDto;
use crate::entity::user::AuthProvider;
use crate::error::auth_error::AuthError;
use async_trait::async_trait;
use std::sync::Arc;

/// An externally verified identity, normalized for the gateway. Values here
/// are trusted: the verifier has already established who the subject is.
#[derive(Clone, Debug)]
pub struct VerifiedProfile {
    pub provider: AuthProvider,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

/// Seam between the gateway and whatever performs the actual provider
/// handshake. Implementations must only return a profile for assertions
/// they have cryptographically or transitively verified.
#[async_trait]
pub trait ProviderVerifier: Send + Sync {
    async fn verify(
        &self,
        provider_slug: &str,
        assertion: &ProviderCallbackDto,
    ) -> Result<VerifiedProfile, AuthError>;
}

/// Verifier for deployments fronted by an identity-aware gateway that has
/// already completed the provider handshake. The callback payload carries the
/// verified profile; this implementation validates the provider slug and
/// normalizes the assertion.
pub struct TrustedGatewayVerifier;

impl TrustedGatewayVerifier {
    pub fn new_shared() -> Arc<dyn ProviderVerifier> {
        Arc::new(Self)
    }
}

#[async_trait]
impl ProviderVerifier for TrustedGatewayVerifier {
    async fn verify(
        &self,
        provider_slug: &str,
        assertion: &ProviderCallbackDto,
    ) -> Result<VerifiedProfile, AuthError> {
        let provider = AuthProvider::from_slug(provider_slug)
            .ok_or_else(|| AuthError::ProviderRejected(format!("unknown provider: {}", provider_slug)))?;

        // The email variant marks locally registered accounts, not an
        // external identity provider. It never appears on the callback path.
        if provider == AuthProvider::Email {
            return Err(AuthError::ProviderRejected(
                "email is not an external identity provider".to_string(),
            ));
        }

        Ok(VerifiedProfile {
            provider,
            email: assertion.email.to_lowercase(),
            firstname: assertion.firstname.clone(),
            lastname: assertion.lastname.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assertion() -> ProviderCallbackDto {
        ProviderCallbackDto {
            email: "Jane.Doe@example.com".to_string(),
            firstname: "Jane".to_string(),
            lastname: "Doe".to_string(),
        }
    }

    #[tokio::test]
    async fn test_known_provider_accepted() {
        let verifier = TrustedGatewayVerifier;
        let profile = verifier.verify("google", &assertion()).await.unwrap();

        assert_eq!(profile.provider, AuthProvider::Google);
        assert_eq!(profile.email, "jane.doe@example.com");
        assert_eq!(profile.firstname, "Jane");
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let verifier = TrustedGatewayVerifier;
        let result = verifier.verify("github", &assertion()).await;

        assert!(matches!(result, Err(AuthError::ProviderRejected(_))));
    }

    #[tokio::test]
    async fn test_email_slug_rejected() {
        let verifier = TrustedGatewayVerifier;
        let result = verifier.verify("email", &assertion()).await;

        assert!(matches!(result, Err(AuthError::ProviderRejected(_))));
    }
}
