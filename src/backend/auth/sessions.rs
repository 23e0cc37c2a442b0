/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user
 * sessions. Tokens are HS256-signed, carry the user ID in `sub`, and
 * expire one hour after issue.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token lifetime in seconds
pub const TOKEN_TTL_SECS: u64 = 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `secret` - HMAC signing secret
/// * `user_id` - User ID (UUID)
/// * `email` - User email
///
/// # Returns
/// JWT token string
pub fn create_token(
    secret: &str,
    user_id: uuid::Uuid,
    email: String,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_with_ttl(secret, user_id, email, TOKEN_TTL_SECS)
}

fn create_token_with_ttl(
    secret: &str,
    user_id: uuid::Uuid,
    email: String,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = now_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        email,
        exp: now + ttl_secs,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// Rejects bad signatures and expired tokens.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Extract user ID from token
pub fn get_user_id_from_token(secret: &str, token: &str) -> Result<uuid::Uuid, String> {
    let claims = verify_token(secret, token)
        .map_err(|e| format!("Token verification failed: {}", e))?;
    uuid::Uuid::parse_str(&claims.sub)
        .map_err(|e| format!("Invalid user ID in token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_create_token() {
        let user_id = uuid::Uuid::new_v4();
        let token = create_token(SECRET, user_id, "test@example.com".to_string()).unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_token() {
        let user_id = uuid::Uuid::new_v4();
        let email = "test@example.com".to_string();
        let token = create_token(SECRET, user_id, email.clone()).unwrap();

        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.email, email);
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_get_user_id_from_token() {
        let user_id = uuid::Uuid::new_v4();
        let token = create_token(SECRET, user_id, "test@example.com".to_string()).unwrap();
        assert_eq!(get_user_id_from_token(SECRET, &token).unwrap(), user_id);
    }

    #[test]
    fn test_verify_invalid_token() {
        assert!(verify_token(SECRET, "invalid.token.here").is_err());
    }

    #[test]
    fn test_verify_wrong_secret() {
        let token = create_token(SECRET, uuid::Uuid::new_v4(), "a@example.com".to_string()).unwrap();
        assert!(verify_token("another-secret", &token).is_err());
    }

    #[test]
    fn test_verify_expired_token() {
        let now = now_secs();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "a@example.com".to_string(),
            exp: now - 10,
            iat: now - TOKEN_TTL_SECS - 10,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_short_ttl_still_valid_when_fresh() {
        let token =
            create_token_with_ttl(SECRET, uuid::Uuid::new_v4(), "a@example.com".to_string(), 60)
                .unwrap();
        assert!(verify_token(SECRET, &token).is_ok());
    }
}
