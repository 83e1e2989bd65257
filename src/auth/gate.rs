use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::user::Role;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Identity resolved by the access gate, attached to the request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Access gate middleware
///
/// Extracts the bearer token, validates it, and re-resolves the current
/// user record so role changes apply without token re-issuance. A token
/// whose user no longer exists is treated the same as an invalid token.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or_else(ApiError::unauthenticated)?;

    let user_id = state
        .tokens
        .validate(token)
        .map_err(|_| ApiError::invalid_token())?;

    let user = state.users.get(user_id).ok_or_else(ApiError::invalid_token)?;

    debug!(user_id = %user.id, role = user.role.as_str(), "Request authenticated");

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
        role: user.role,
    });

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(ApiError::unauthenticated)
    }
}

/// Extractor enforcing the admin tier on top of authentication
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            return Err(ApiError::forbidden());
        }

        Ok(AdminUser(user))
    }
}
