//! Error types for the service layer

use thiserror::Error;

use crate::mailer::MailError;
use crate::notes::NoteError;
use crate::oauth2::TokenVerificationError;
use crate::otp::OtpError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::userdb::UserError;
use crate::utils::UtilError;
use crate::validation::FieldError;

/// Errors that can occur while serving a request
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Request fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// No outstanding code matches
    #[error("Invalid OTP")]
    InvalidCode,

    /// The code matched but its lifetime is over
    #[error("OTP expired")]
    Expired,

    /// An account already exists for this email
    #[error("Account already exists")]
    DuplicateAccount,

    /// Unknown email, wrong password or an account without a password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The external identity provider's token was rejected
    #[error("Invalid external token: {0}")]
    InvalidExternalToken(String),

    /// Missing or unusable session token
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Resource not found with context
    #[error("Resource not found: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Mail delivery error
    #[error("Mail error: {0}")]
    Mail(MailError),

    /// Identity provider could not be reached
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// Error from Session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    UtilsError(UtilError),
}

impl CoordinationError {
    /// Log the error and return self
    ///
    /// Client errors are logged at warn level, server-side failures at error level.
    pub fn log(self) -> Self {
        match &self {
            Self::Validation(errors) => {
                tracing::warn!(count = errors.len(), "Validation failed")
            }
            Self::InvalidCode => tracing::warn!("Invalid OTP"),
            Self::Expired => tracing::warn!("OTP expired"),
            Self::DuplicateAccount => tracing::warn!("Account already exists"),
            Self::InvalidCredentials => tracing::warn!("Invalid email or password"),
            Self::InvalidExternalToken(msg) => tracing::warn!("Invalid external token: {}", msg),
            Self::Unauthenticated => tracing::warn!("Unauthenticated"),
            Self::ResourceNotFound {
                resource_type,
                resource_id,
            } => tracing::warn!("Resource not found: {} {}", resource_type, resource_id),
            Self::Database(msg) => tracing::error!("Database error: {}", msg),
            Self::Mail(err) => tracing::error!("Mail error: {}", err),
            Self::Provider(msg) => tracing::error!("Identity provider error: {}", msg),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::UtilsError(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }

    /// Whether the failure is on the server side rather than in the request
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Mail(_)
                | Self::Provider(_)
                | Self::SessionError(_)
                | Self::UtilsError(_)
        )
    }

    pub(crate) fn not_found(resource_type: &str, resource_id: &str) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
        }
    }
}

// Custom From implementations that automatically log errors

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Duplicate(_) => Self::DuplicateAccount,
            other => {
                let error = Self::Database(other.to_string());
                tracing::error!("{}", error);
                error
            }
        }
    }
}

impl From<OtpError> for CoordinationError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::InvalidCode => Self::InvalidCode,
            OtpError::Expired => Self::Expired,
            OtpError::Storage(msg) => {
                let error = Self::Database(msg);
                tracing::error!("{}", error);
                error
            }
            OtpError::Utils(err) => Self::from(err),
        }
    }
}

impl From<NoteError> for CoordinationError {
    fn from(err: NoteError) -> Self {
        let error = Self::Database(err.to_string());
        tracing::error!("{}", error);
        error
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        let error = Self::Database(err.to_string());
        tracing::error!("{}", error);
        error
    }
}

impl From<MailError> for CoordinationError {
    fn from(err: MailError) -> Self {
        let error = Self::Mail(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<TokenVerificationError> for CoordinationError {
    fn from(err: TokenVerificationError) -> Self {
        if err.is_provider_failure() {
            let error = Self::Provider(err.to_string());
            tracing::error!("{}", error);
            error
        } else {
            let error = Self::InvalidExternalToken(err.to_string());
            tracing::warn!("{}", error);
            error
        }
    }
}

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Signing(_) => {
                let error = Self::SessionError(err);
                tracing::error!("{}", error);
                error
            }
            other => {
                tracing::debug!("Session rejected: {}", other);
                Self::Unauthenticated
            }
        }
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        let error = Self::UtilsError(err);
        tracing::error!("{}", error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_user_maps_to_duplicate_account() {
        let err: CoordinationError = UserError::Duplicate("email".to_string()).into();
        assert!(matches!(err, CoordinationError::DuplicateAccount));
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_otp_errors_keep_their_meaning() {
        assert!(matches!(
            CoordinationError::from(OtpError::InvalidCode),
            CoordinationError::InvalidCode
        ));
        assert!(matches!(
            CoordinationError::from(OtpError::Expired),
            CoordinationError::Expired
        ));
        assert!(
            CoordinationError::from(OtpError::Storage("db down".to_string())).is_server_error()
        );
    }

    #[test]
    fn test_session_rejections_collapse_to_unauthenticated() {
        for err in [
            SessionError::Missing,
            SessionError::Expired,
            SessionError::Invalid("bad signature".to_string()),
        ] {
            assert!(matches!(
                CoordinationError::from(err),
                CoordinationError::Unauthenticated
            ));
        }
    }

    #[test]
    fn test_token_errors_split_by_cause() {
        let bad_token: CoordinationError = TokenVerificationError::TokenExpired.into();
        let provider_down: CoordinationError =
            TokenVerificationError::JwksFetch("connection refused".to_string()).into();

        assert!(matches!(
            bad_token,
            CoordinationError::InvalidExternalToken(_)
        ));
        assert!(matches!(provider_down, CoordinationError::Provider(_)));
        assert!(provider_down.is_server_error());
    }

    #[test]
    fn test_log_returns_self() {
        let err = CoordinationError::not_found("Note", "n1").log();
        assert_eq!(err.to_string(), "Resource not found: Note n1");
    }
}
