pub mod auth_service;
pub mod provider;
pub mod rotation_service;
pub mod token_service;
