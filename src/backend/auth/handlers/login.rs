/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate a one-hour JWT
 *
 * Unknown email and wrong password produce the same 401 so accounts
 * cannot be enumerated.
 */

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{require_credentials, LoginRequest, TokenResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, verify_password};
use crate::backend::error::BackendError;
use crate::backend::server::config::ServerConfig;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - missing email or password
/// * `401 Unauthorized` - unknown user or wrong password
/// * `500 Internal Server Error` - database or token signing failure
///
/// # Example Response
///
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..." }
/// ```
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<ServerConfig>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, BackendError> {
    let Json(request) = payload?;
    let (email, password) = require_credentials(request.email, request.password)
        .ok_or_else(|| BackendError::validation("Email and password are required"))?;
    tracing::info!("Login request for: {}", email);

    let user = get_user_by_email(&pool, &email).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", email);
        BackendError::unauthorized("Invalid credentials")
    })?;

    if !verify_password(&password, &user) {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::unauthorized("Invalid credentials"));
    }

    let token = create_token(&config.jwt_secret, user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("Failed to create token")
    })?;

    tracing::info!("User logged in successfully: {}", user.email);

    Ok(Json(TokenResponse { token }))
}
