use axum::{Json, Router, extract::State, routing::post};
use http::StatusCode;
use std::sync::Arc;

use crate::error::ApiError;
use crate::extract::JsonBody;
use otp_notes::{
    AuthResponse, GoogleLoginRequest, LoginRequest, MessageResponse, RegisterRequest,
    SendOtpRequest, Services, VerifyOtpRequest,
};

pub(crate) fn router() -> Router<Arc<Services>> {
    Router::new()
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/google", post(google))
}

async fn send_otp(
    State(services): State<Arc<Services>>,
    JsonBody(req): JsonBody<SendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(services.auth.request_otp(req).await?))
}

async fn verify_otp(
    State(services): State<Arc<Services>>,
    JsonBody(req): JsonBody<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(services.auth.verify_otp(req).await?))
}

async fn register(
    State(services): State<Arc<Services>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let resp = services.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

async fn login(
    State(services): State<Arc<Services>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(services.auth.login(req).await?))
}

async fn google(
    State(services): State<Arc<Services>>,
    JsonBody(req): JsonBody<GoogleLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(services.auth.login_with_google(req).await?))
}
