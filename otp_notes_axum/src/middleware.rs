use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::session::AuthUser;
use otp_notes::Services;

/// Reject requests without a valid bearer token with 401
///
/// On success the caller's [`AuthUser`] is stored in the request extensions,
/// so handlers behind this layer extract it without verifying the token again.
///
/// ```no_run
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use otp_notes_axum::{Services, require_auth};
/// use std::sync::Arc;
///
/// async fn secret() -> &'static str { "secret" }
///
/// fn app(services: Arc<Services>) -> Router {
///     Router::new()
///         .route("/secret", get(secret))
///         .route_layer(from_fn_with_state(services.clone(), require_auth))
///         .with_state(services)
/// }
/// ```
pub async fn require_auth(
    State(services): State<Arc<Services>>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    match AuthUser::from_bearer(&mut parts, &services).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "Authenticated request");
            parts.extensions.insert(user);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    }
}
