use super::auth;
use crate::config::database::Database;
use crate::routes::{health, profile};
use crate::service::provider::TrustedGatewayVerifier;
use crate::service::rotation_service::RotationService;
use crate::service::token_service::TokenService;
use crate::state::auth_state::AuthState;
use crate::state::token_state::TokenState;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn routes(
    db_conn: Arc<Database>,
    token_service: TokenService,
    rotation_service: RotationService,
) -> Router {
    let merged_router = {
        let auth_state = AuthState::new(
            &db_conn,
            rotation_service,
            TrustedGatewayVerifier::new_shared(),
        );
        let token_state = TokenState::new(token_service);

        auth::routes()
            .with_state(auth_state)
            .merge(profile::routes(token_state))
            .merge(health::routes().with_state(db_conn.clone()))
    };

    Router::new()
        .nest("/api", merged_router)
        .layer(TraceLayer::new_for_http())
}
