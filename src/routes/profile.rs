use crate::handler::profile_handler;
use crate::middleware::auth as auth_middleware;
use crate::state::token_state::TokenState;
use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;

/// Claims-backed routes; everything here sits behind the access token gate.
pub fn routes(token_state: TokenState) -> Router {
    Router::new()
        .route("/profile", get(profile_handler::profile))
        .layer(ServiceBuilder::new().layer(middleware::from_fn_with_state(
            token_state,
            auth_middleware::auth,
        )))
}
