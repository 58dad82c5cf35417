use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum OtpError {
    #[error("Invalid OTP")]
    InvalidCode,

    #[error("OTP expired")]
    Expired,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<sqlx::Error> for OtpError {
    fn from(err: sqlx::Error) -> Self {
        OtpError::Storage(err.to_string())
    }
}
