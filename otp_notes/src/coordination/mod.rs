//! Service layer
//!
//! Coordinates the stores, the mailer, the session tokens and the external
//! identity verifier. HTTP adapters call into [`AuthService`] and
//! [`NotesService`] through a shared [`Services`] value.

mod auth;
mod errors;
mod notes;
mod services;
mod types;

pub use auth::AuthService;
pub use errors::CoordinationError;
pub use notes::NotesService;
pub use services::Services;
pub use types::{
    AuthResponse, CreateNoteRequest, GoogleLoginRequest, LoginRequest, MessageResponse,
    RegisterRequest, SendOtpRequest, UpdateNoteRequest, UserSummary, Validate, VerifyOtpRequest,
};
