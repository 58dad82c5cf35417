use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("Missing session token")]
    Missing,

    #[error("Invalid session token: {0}")]
    Invalid(String),

    #[error("Session token expired")]
    Expired,

    #[error("Failed to sign session token: {0}")]
    Signing(String),
}
