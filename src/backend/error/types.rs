/**
 * Backend Error Types
 *
 * This module defines the error type returned by HTTP handlers and the
 * authentication middleware.
 *
 * # Error Categories
 *
 * - Validation errors: missing or malformed input (400)
 * - Authentication errors: missing, invalid or expired token (401)
 * - Not-found errors: unknown resource, or a resource owned by someone
 *   else (404). The two cases are deliberately indistinguishable.
 * - Infrastructure errors: database or internal failures (500). The
 *   underlying detail is logged, never returned to the client.
 */

use thiserror::Error;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use xftodo::backend::error::BackendError;
///
/// let err = BackendError::validation("Task text is required");
/// let err = BackendError::unauthorized("Invalid token");
/// let err = BackendError::not_found("Task not found");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Missing or malformed client input
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message
        message: String,
    },

    /// Missing, malformed, invalid or expired credentials
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Resource does not exist or is not owned by the caller
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other server-side failure (hashing, token signing, ...)
    #[error("Internal error: {message}")]
    Internal {
        /// Detail for the logs
        message: String,
    },
}

impl BackendError {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation` - 400 Bad Request
    /// - `Unauthorized` - 401 Unauthorized
    /// - `NotFound` - 404 Not Found
    /// - `Database` / `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message returned to the client
    ///
    /// Server-side failures collapse to a generic message.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::Unauthorized { message }
            | Self::NotFound { message } => message.clone(),
            Self::Database(_) | Self::Internal { .. } => "Server error".to_string(),
        }
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        Self::Validation {
            message: err.detail().to_string(),
        }
    }
}

/// Body extraction failures (bad JSON, wrong field types, missing
/// `Content-Type`) are client errors, whatever status axum picked
impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self::Validation {
            message: rejection.body_text(),
        }
    }
}
