use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::user::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role, UserResponse,
};
use crate::stores::user_store::UserStoreError;
use crate::validation::input;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Register a new user account
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let username = input::validate_username(&body.username)?;
    let email = input::validate_email(&body.email)?;
    input::validate_password(&body.password)?;

    let user = state
        .users
        .register(&username, &email, &body.password, Role::User)
        .map_err(|err| match err {
            UserStoreError::DuplicateUsername | UserStoreError::DuplicateEmail => {
                ApiError::Conflict(err.to_string())
            }
            other => ApiError::Internal(other.into()),
        })?;

    info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: UserResponse::from_user(&user),
        }),
    )
        .into_response())
}

/// Log in with email and password, receiving a bearer token
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = input::validate_email(&body.email)?;

    let user = state
        .users
        .verify_credentials(&email, &body.password)
        .map_err(|err| ApiError::Internal(err.into()))?
        .ok_or_else(|| {
            // Uniform message for unknown email and wrong password
            warn!(email = %email, "Failed login attempt");
            ApiError::Unauthenticated("invalid email or password".to_string())
        })?;

    let (token, expires_in) = state.tokens.issue(user.id)?;

    info!(user_id = %user.id, username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in,
        user: UserResponse::from_user(&user),
    })
    .into_response())
}
