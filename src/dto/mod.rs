pub mod auth_dto;
pub mod token_dto;
