use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use http::request::Parts;
use std::sync::Arc;

use crate::error::ApiError;
use otp_notes::{SessionClaims, Services};

/// Authenticated caller, available as an Axum extractor
///
/// Resolved from an `Authorization: Bearer <token>` header, or taken from the
/// request extensions when [`require_auth`](crate::require_auth) already ran.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use otp_notes_axum::{AuthUser, Services};
/// use std::sync::Arc;
///
/// async fn whoami(user: AuthUser) -> String {
///     format!("Hello, {}!", user.email)
/// }
///
/// fn app(services: Arc<Services>) -> Router {
///     Router::new().route("/whoami", get(whoami)).with_state(services)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    /// Unique user identifier
    pub id: String,
    /// Email the session was issued for
    pub email: String,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
        }
    }
}

impl AuthUser {
    pub(crate) async fn from_bearer(
        parts: &mut Parts,
        services: &Services,
    ) -> Result<Self, ApiError> {
        let token = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let claims = services.auth.authenticate(token.as_deref())?;
        Ok(claims.into())
    }
}

impl FromRequestParts<Arc<Services>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<Services>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        Self::from_bearer(parts, state).await
    }
}
