use crate::config::database::Database;
use crate::service::auth_service::AuthService;
use crate::service::provider::ProviderVerifier;
use crate::service::rotation_service::RotationService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub(crate) auth_service: AuthService,
    pub(crate) rotation_service: RotationService,
    pub(crate) provider_verifier: Arc<dyn ProviderVerifier>,
}

impl AuthState {
    pub fn new(
        db_conn: &Arc<Database>,
        rotation_service: RotationService,
        provider_verifier: Arc<dyn ProviderVerifier>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(db_conn, rotation_service.clone()),
            rotation_service,
            provider_verifier,
        }
    }
}
