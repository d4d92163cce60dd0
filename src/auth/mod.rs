pub mod authorization;
pub mod jwks;
pub mod jwt;
pub mod middleware;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("signing key {0} not found in JWKS")]
    UnknownKey(String),
    #[error("failed to load JWKS: {0}")]
    Jwks(String),
}
