/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /signup.
 *
 * # Registration Process
 *
 * 1. Require email and password
 * 2. Validate email format
 * 3. Check if user already exists
 * 4. Hash password using bcrypt
 * 5. Create user in database
 *
 * Signup does not log the user in; the client calls `/login` next.
 */

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::hash;
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{require_credentials, MessageResponse, SignupRequest};
use crate::backend::auth::users::{create_user, get_user_by_email};
use crate::backend::error::BackendError;
use crate::backend::server::config::ServerConfig;

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - missing email or password, email without `@`,
///   or email already registered
/// * `500 Internal Server Error` - hashing or database failure
///
/// # Example Request
///
/// ```http
/// POST /signup HTTP/1.1
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "hunter22" }
/// ```
///
/// Responds `201 Created` with `{ "message": "User created" }`.
pub async fn signup(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<ServerConfig>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), BackendError> {
    let Json(request) = payload?;
    let (email, password) = require_credentials(request.email, request.password)
        .ok_or_else(|| BackendError::validation("Email and password are required"))?;
    tracing::info!("Signup request for email: {}", email);

    // Basic format check
    if !email.contains('@') {
        tracing::warn!("Invalid email format: {}", email);
        return Err(BackendError::validation("Invalid email format"));
    }

    if get_user_by_email(&pool, &email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::validation("User already exists"));
    }

    let password_hash = hash(&password, config.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("Failed to hash password")
    })?;

    // The pre-check can race a concurrent signup; the unique index decides.
    let user = create_user(&pool, email, password_hash).await.map_err(|e| {
        let duplicate = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if duplicate {
            BackendError::validation("User already exists")
        } else {
            BackendError::from(e)
        }
    })?;

    tracing::info!("User created successfully: {} ({})", user.email, user.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created".to_string(),
        }),
    ))
}
