use crate::handler::auth_handler;
use crate::handler::refresh_handler;
use crate::state::auth_state::AuthState;
use axum::{routing::get, routing::post, Router};

pub fn routes() -> Router<AuthState> {
    Router::<AuthState>::new()
        .route(
            "/auth/callback/{provider}",
            get(auth_handler::provider_callback_get).post(auth_handler::provider_callback_post),
        )
        .route("/auth/refresh", post(refresh_handler::refresh_token))
        .route("/auth/logout", post(refresh_handler::logout))
}
