use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON request body whose parse failures become validation errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
