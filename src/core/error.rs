// Centralized error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::stores::sweet_store::StoreError;

/// Request-scoped errors surfaced to API callers
///
/// Every variant maps to a stable machine-readable `kind` plus a
/// human-readable message. Nothing here is retried internally.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("insufficient quantity in stock: {requested} requested, {available} available")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::InsufficientStock { .. } => "insufficient_stock",
            ApiError::Internal(_) => "internal",
        }
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated("authentication required".to_string())
    }

    pub fn invalid_token() -> Self {
        ApiError::Unauthenticated("invalid or expired token".to_string())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("insufficient privilege".to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        // Internal details stay in the logs, not the response body
        let message = if let ApiError::Internal(ref e) = self {
            tracing::error!(error = %e, "Internal error while handling request");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                kind,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName(name) => {
                ApiError::Conflict(format!("a sweet named '{}' already exists", name))
            }
            StoreError::NotFound => ApiError::NotFound("Sweet not found".to_string()),
            StoreError::InsufficientStock {
                requested,
                available,
            } => ApiError::InsufficientStock {
                requested,
                available,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidInput("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthenticated().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InsufficientStock {
                requested: 5,
                available: 2
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(ApiError::invalid_token().kind(), "unauthenticated");
        assert_eq!(
            ApiError::InsufficientStock {
                requested: 5,
                available: 2
            }
            .kind(),
            "insufficient_stock"
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::DuplicateName("Fudge".into()).into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = StoreError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = StoreError::InsufficientStock {
            requested: 10,
            available: 3,
        }
        .into();
        assert_eq!(err.kind(), "insufficient_stock");
    }

    #[test]
    fn test_forbidden_distinct_from_unauthenticated() {
        assert_ne!(
            ApiError::forbidden().status(),
            ApiError::unauthenticated().status()
        );
        assert_ne!(ApiError::forbidden().kind(), ApiError::unauthenticated().kind());
    }
}
