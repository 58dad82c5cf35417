//! Axum integration for the otp-notes library
//!
//! Mounts the `/auth` and `/notes` endpoints on an axum [`Router`](axum::Router),
//! resolves bearer tokens to an [`AuthUser`] and maps service errors to JSON
//! error responses.

mod auth;
mod error;
mod extract;
mod health;
mod middleware;
mod notes;
mod router;
mod session;

pub use error::ApiError;
pub use extract::JsonBody;
pub use middleware::require_auth;
pub use router::{notes_api_router, notes_api_router_no_trace};
pub use session::AuthUser;

// Re-export the core types handlers and servers need
pub use otp_notes::{CoordinationError, Services, Settings};
