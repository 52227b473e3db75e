use crate::service::token_service::TokenService;

#[derive(Clone)]
pub struct TokenState {
    pub token_service: TokenService,
}

impl TokenState {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }
}
