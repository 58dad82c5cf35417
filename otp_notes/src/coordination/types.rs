//! Request and response bodies of the service operations

use serde::{Deserialize, Serialize};

use crate::userdb::User;
use crate::validation::{FieldError, Validator};

const OTP_LENGTH: usize = 6;
const MIN_PASSWORD_LENGTH: usize = 6;

/// Checks a request before any business logic runs
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

// Missing fields deserialize to empty strings so they are reported per field.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

impl Validate for SendOtpRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new().email("email", &self.email).finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
}

impl Validate for VerifyOtpRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .email("email", &self.email)
            .exact_len("code", &self.code, OTP_LENGTH)
            .finish()
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub otp: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .email("email", &self.email)
            .min_len("password", &self.password, MIN_PASSWORD_LENGTH)
            .exact_len("otp", &self.otp, OTP_LENGTH)
            .finish()
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .email("email", &self.email)
            .min_len("password", &self.password, 1)
            .finish()
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    #[serde(default)]
    pub id_token: String,
}

impl std::fmt::Debug for GoogleLoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleLoginRequest").finish_non_exhaustive()
    }
}

impl Validate for GoogleLoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .min_len("idToken", &self.id_token, 1)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Validate for CreateNoteRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .non_empty("title", &self.title, "Title is required")
            .non_empty("content", &self.content, "Content is required")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Validate for UpdateNoteRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .optional_non_empty("title", self.title.as_deref(), "Title is required")
            .optional_non_empty("content", self.content.as_deref(), "Content is required")
            .finish()
    }
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Result of every successful sign-in
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}
