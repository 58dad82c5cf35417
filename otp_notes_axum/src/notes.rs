use axum::{
    Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, put},
};
use http::StatusCode;
use std::sync::Arc;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::require_auth;
use crate::session::AuthUser;
use otp_notes::{CreateNoteRequest, MessageResponse, Note, Services, UpdateNoteRequest};

/// Every route here requires a bearer token
pub(crate) fn router(services: Arc<Services>) -> Router<Arc<Services>> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/{id}", put(update_note).delete(delete_note))
        .route_layer(from_fn_with_state(services, require_auth))
}

async fn list_notes(
    State(services): State<Arc<Services>>,
    user: AuthUser,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(services.notes.list(&user.id).await?))
}

async fn create_note(
    State(services): State<Arc<Services>>,
    user: AuthUser,
    JsonBody(req): JsonBody<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = services.notes.create(&user.id, req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(services): State<Arc<Services>>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(services.notes.update(&user.id, &id, req).await?))
}

async fn delete_note(
    State(services): State<Arc<Services>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(services.notes.delete(&user.id, &id).await?))
}
