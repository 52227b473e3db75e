pub mod auth_handler;
pub mod health_handler;
pub mod profile_handler;
pub mod refresh_handler;
