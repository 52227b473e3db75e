use crate::config::parameter;
use crate::dto::token_dto::{TokenClaimsDto, TokenReadDto};
use crate::entity::user::User;
use crate::error::token_error::TokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Codec configuration, resolved once at startup and injected. `leeway_seconds`
/// widens only the expiry check; 0 means exact-deadline rejection.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_minutes: i64,
    pub leeway_seconds: u64,
}

impl TokenConfig {
    pub fn from_env() -> Self {
        Self {
            secret: parameter::get("JWT_SECRET"),
            ttl_minutes: parameter::get_i64("ACCESS_TOKEN_TTL_MINUTES"),
            leeway_seconds: parameter::get_u64("JWT_CLOCK_SKEW_SECONDS"),
        }
    }
}

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_minutes: i64,
    leeway_seconds: u64,
}

pub trait TokenServiceTrait {
    fn new(config: TokenConfig) -> Result<Self, TokenError>
    where
        Self: Sized;
    fn issue(&self, user: &User) -> Result<TokenReadDto, TokenError>;
    fn verify(&self, token: &str) -> Result<TokenClaimsDto, TokenError>;
}

impl TokenServiceTrait for TokenService {
    fn new(config: TokenConfig) -> Result<Self, TokenError> {
        // 256-bit minimum for the HS256 secret
        if config.secret.len() < 32 {
            return Err(TokenError::CreationFailed(
                "JWT secret must be at least 32 bytes (256 bits). Current length: ".to_string()
                    + &config.secret.len().to_string(),
            ));
        }

        Ok(Self {
            secret: config.secret,
            ttl_minutes: config.ttl_minutes,
            leeway_seconds: config.leeway_seconds,
        })
    }

    /// Deterministically encode the user's identity into a signed, short-lived
    /// token. Pure function of (user, now); no storage involved.
    fn issue(&self, user: &User) -> Result<TokenReadDto, TokenError> {
        let iat = chrono::Utc::now().timestamp();
        let exp = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::minutes(self.ttl_minutes))
            .ok_or_else(|| {
                TokenError::CreationFailed("Token expiration calculation overflow".to_string())
            })?
            .timestamp();

        let claims = TokenClaimsDto {
            sub: user.id.clone(),
            email: user.email.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            role: user.role,
            iat,
            exp,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| TokenError::CreationFailed(e.to_string()))?;

        Ok(TokenReadDto { token, iat, exp })
    }

    /// Check signature and expiry, returning the embedded claims. Failures
    /// split into `Expired`, `InvalidSignature`, and `Malformed` for the
    /// audit log; the HTTP layer collapses them into one generic 401.
    fn verify(&self, token: &str) -> Result<TokenClaimsDto, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        // Validation::new defaults to 60s leeway; the configured skew wins.
        validation.leeway = self.leeway_seconds;

        decode::<TokenClaimsDto>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })
    }
}
