//! Combined router for the auth and notes endpoints

use axum::{Router, routing::get};
use http::{HeaderValue, Method, header};
use otp_notes::{ServerSettings, Services};
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::health::health;

/// Create the router for all endpoints
///
/// The endpoints will be available at:
/// - {route_prefix}/auth/...
/// - {route_prefix}/notes/...
/// - /health
pub fn notes_api_router(services: Arc<Services>, server: &ServerSettings) -> Router {
    notes_api_router_no_trace(services, server).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`notes_api_router`] without the HTTP tracing middleware
pub fn notes_api_router_no_trace(services: Arc<Services>, server: &ServerSettings) -> Router {
    let api = Router::new()
        .nest("/auth", super::auth::router())
        .nest("/notes", super::notes::router(services.clone()));

    let app = if server.route_prefix.is_empty() {
        api
    } else {
        Router::new().nest(&server.route_prefix, api)
    };

    app.route("/health", get(health))
        .with_state(services)
        .layer(cors_layer(server.cors_allowed_origin.as_deref()))
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match allowed_origin {
        None => layer.allow_origin(Any),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(value),
            Err(e) => {
                tracing::error!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                layer
            }
        },
    }
}
