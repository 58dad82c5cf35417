//! otp-notes - core library of the OTP notes backend
//!
//! Provides email one-time codes, password and Google sign-in with stateless
//! session tokens, and per-user notes, on top of a SQLite or PostgreSQL
//! database. HTTP bindings live in the `otp-notes-axum` crate.

mod config;
mod coordination;
mod mailer;
mod notes;
mod oauth2;
mod otp;
mod password;
mod session;
mod storage;
mod userdb;
mod utils;
mod validation;

#[cfg(test)]
mod test_utils;

pub use config::{
    CacheStoreKind, CacheStoreSettings, ConfigError, DataStoreKind, DataStoreSettings,
    GoogleSettings, MailSettings, MailTransportKind, OtpSettings, ServerSettings,
    SessionSettings, Settings,
};

pub use coordination::{
    AuthResponse, AuthService, CoordinationError, CreateNoteRequest, GoogleLoginRequest,
    LoginRequest, MessageResponse, NotesService, RegisterRequest, SendOtpRequest, Services,
    UpdateNoteRequest, UserSummary, Validate, VerifyOtpRequest,
};

pub use mailer::{MailError, Mailer, MemoryMailer, SentMail, SmtpMailer, build_mailer};
pub use notes::Note;
pub use oauth2::{ExternalIdentity, GoogleIdTokenVerifier, IdTokenVerifier, TokenVerificationError};
pub use session::{SessionClaims, SessionError, SessionTokens};
pub use storage::{
    CacheData, CacheStore, DataStore, SharedCacheStore, StorageError, connect_cache_store,
    connect_data_store,
};
pub use userdb::User;
pub use utils::UtilError;
pub use validation::{FieldError, is_valid_email};
