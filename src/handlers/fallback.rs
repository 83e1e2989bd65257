use crate::core::error::ApiError;
use axum::response::{IntoResponse, Response};

pub async fn fallback_handler() -> Response {
    ApiError::NotFound("Unknown endpoint".to_string()).into_response()
}
