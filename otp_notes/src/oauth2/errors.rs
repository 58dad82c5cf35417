use thiserror::Error;

use crate::utils::UtilError;

#[derive(Error, Debug, Clone)]
pub enum TokenVerificationError {
    #[error("JSON parsing failed: {0}")]
    Json(String),
    #[error("JWT error: {0}")]
    Jwt(String),
    #[error("Invalid token format")]
    InvalidTokenFormat,
    #[error("Invalid token signature")]
    InvalidTokenSignature,
    #[error("Invalid token audience, expected: {0}, actual: {1}")]
    InvalidTokenAudience(String, String),
    #[error("Invalid token issuer: {0}")]
    InvalidTokenIssuer(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Token not yet valid, now: {0}, nbf: {1}")]
    TokenNotYetValidNotBeFore(i64, i64),
    #[error("Token not yet valid, now: {0}, iat: {1}")]
    TokenNotYetValidIssuedAt(i64, i64),
    #[error("Token carries no email")]
    MissingEmail,
    #[error("No matching key found in JWKS")]
    NoMatchingKey,
    #[error("Missing key component: {0}")]
    MissingKeyComponent(String),
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
    #[error("JWKS parsing error: {0}")]
    JwksParsing(String),
    #[error("JWKS fetch error: {0}")]
    JwksFetch(String),
}

impl TokenVerificationError {
    /// The provider's key endpoint could not be used, as opposed to a bad token
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            TokenVerificationError::JwksFetch(_) | TokenVerificationError::JwksParsing(_)
        )
    }
}

impl From<serde_json::Error> for TokenVerificationError {
    fn from(err: serde_json::Error) -> Self {
        TokenVerificationError::Json(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for TokenVerificationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TokenVerificationError::Jwt(err.to_string())
    }
}
