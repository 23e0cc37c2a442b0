/**
 * Public API Routes
 *
 * Endpoints that do not require a token:
 * - `POST /signup` - User registration
 * - `POST /login` - Exchange credentials for a JWT
 * - `GET /health` - Liveness probe
 */

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::backend::auth::{login, signup};
use crate::backend::server::state::AppState;

/// Configure public API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
