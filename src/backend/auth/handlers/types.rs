/**
 * Authentication Handler Types
 *
 * Request and response bodies for the signup and login handlers. Request
 * fields are optional so a missing field is reported as a 400 with a
 * readable message instead of a deserialization rejection.
 */

use serde::{Deserialize, Serialize};

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct SignupRequest {
    /// User's email address, also the reminder recipient
    pub email: Option<String>,
    /// User's password (will be hashed before storage)
    pub password: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    /// Verified against the stored hash
    pub password: Option<String>,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Returned by login
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    /// JWT token for the `Authorization: Bearer` header (1 hour expiry)
    pub token: String,
}

/// Email and password from a request, both present and non-blank
pub(crate) fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Option<(String, String)> {
    let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())?;
    let password = password.filter(|p| !p.is_empty())?;
    Some((email, password))
}
