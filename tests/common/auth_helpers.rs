//! Authentication test helpers
//!
//! Create users through the HTTP API and log them in.

use axum::http::StatusCode;
use serde_json::json;

use super::app::TestApp;

/// Signed-up and logged-in test user
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Sign up and log in `email` through the API
pub async fn create_test_user(app: &TestApp, email: &str) -> TestUser {
    let password = "test_password_123";

    let (status, _) = app
        .post("/signup", None, json!({ "email": email, "password": password }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed for {}", email);

    let (status, body) = app
        .post("/login", None, json!({ "email": email, "password": password }))
        .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}", email);

    TestUser {
        email: email.to_string(),
        password: password.to_string(),
        token: body["token"].as_str().expect("login returned no token").to_string(),
    }
}
