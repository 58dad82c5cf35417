use axum::{
    Json,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use otp_notes::{CoordinationError, FieldError};
use serde::Serialize;

/// JSON error body: a stable `error` code, a human `message` and, for
/// validation failures, the rejected fields
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub CoordinationError);

impl From<CoordinationError> for ApiError {
    fn from(err: CoordinationError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CoordinationError::Validation(vec![FieldError {
            field: "body".to_string(),
            message: rejection.body_text(),
        }]))
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let err = if self.0.is_server_error() {
            self.0.log()
        } else {
            self.0
        };

        let body = |error: &'static str, message: String| ErrorBody {
            error,
            message,
            errors: None,
        };

        match err {
            CoordinationError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "ValidationError",
                    message: "Validation failed".to_string(),
                    errors: Some(errors),
                },
            ),
            CoordinationError::InvalidCode => (
                StatusCode::BAD_REQUEST,
                body("InvalidOTP", "Invalid OTP".to_string()),
            ),
            CoordinationError::Expired => (
                StatusCode::BAD_REQUEST,
                body("OTPExpired", "OTP expired".to_string()),
            ),
            CoordinationError::InvalidExternalToken(_) => (
                StatusCode::BAD_REQUEST,
                body("InvalidExternalToken", "Invalid Google token".to_string()),
            ),
            CoordinationError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                body("InvalidCredentials", "Invalid credentials".to_string()),
            ),
            CoordinationError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                body("Unauthenticated", "Invalid or missing token".to_string()),
            ),
            CoordinationError::DuplicateAccount => (
                StatusCode::CONFLICT,
                body("DuplicateAccount", "User already exists".to_string()),
            ),
            CoordinationError::ResourceNotFound { resource_type, .. } => (
                StatusCode::NOT_FOUND,
                body("NotFound", format!("{resource_type} not found")),
            ),
            // Details stay in the server log
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                body("ServerError", "Server error".to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
